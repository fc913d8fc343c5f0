//! AI guide conversation layer.
//!
//! A state-machine orchestrator over a single conversation: user utterances
//! in, final spoken/displayed text out, with tool-call dispatch in between.
//! The language model itself is a trait boundary; nothing in here performs
//! real inference.

pub mod message_tracker;
pub mod model;
pub mod orchestrator;
pub mod tools;

pub use message_tracker::MessageTracker;
pub use model::{ChatTurn, LanguageModel, ModelError, ModelReply, Role, ToolSpec};
pub use orchestrator::{AssistantResponse, ConversationOrchestrator};
pub use tools::{NavigationTarget, ToolInvocation};
