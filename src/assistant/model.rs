//! Language-model collaborator boundary.
//!
//! The orchestrator only ever sees this trait: an ordered conversation plus
//! a tool catalog goes in, free text or a single tool invocation comes out.
//! Real backends (a managed inference API) and test doubles both implement
//! it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A tool offered to the model: name, description, and a JSON-schema-like
/// parameter spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// What the model returned: either free text or a request to run one tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    ToolUse { name: String, input: Value },
}

/// Failures from the model collaborator. The orchestrator degrades to
/// passthrough on any of these; it never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Network(String),

    #[error("model authentication failed: {0}")]
    Auth(String),

    #[error("model request timed out")]
    Timeout,

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Trait for language-model backends.
pub trait LanguageModel: Send + Sync {
    /// Run one conversational inference over the given turns and tools.
    fn converse(
        &self,
        turns: &[ChatTurn],
        tools: &[ToolSpec],
    ) -> impl std::future::Future<Output = Result<ModelReply, ModelError>> + Send;
}
