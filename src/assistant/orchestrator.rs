//! Conversation orchestration.
//!
//! Owns a bounded dialogue history, invokes the language-model collaborator
//! with the tool catalog, dispatches tool replies to local handlers, and
//! produces the final text handed to the avatar/output channel. Model
//! failures degrade to passing the user's utterance through unchanged; the
//! conversation never blocks on the model.
//!
//! At most one inference is in flight per conversation: `submit_utterance`
//! takes `&mut self`, so the borrow checker serializes submissions. Callers
//! that need queuing hold the orchestrator behind an async mutex.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender};
use uuid::Uuid;

use super::message_tracker::MessageTracker;
use super::model::{ChatTurn, LanguageModel, ModelError, ModelReply, ToolSpec};
use super::tools::{self, NavigationTarget, ToolInvocation};
use crate::catalog::{AttractionCatalog, NearbyAttraction};
use crate::geo;
use crate::proximity::ProximityAlert;
use crate::recommend::{Recommendation, Recommender, TourismContext};

/// Default bounded history window, in turns.
const DEFAULT_HISTORY_TURNS: usize = 20;

/// How many active alerts and recommendations the context note mentions.
const CONTEXT_NOTE_ITEMS: usize = 3;

/// Standing instruction prepended to every prompt window.
const PRIMER: &str = "You are a helpful travel assistant AI for Singapore. \
    Provide useful information based on the traveler's questions. If they ask \
    about weather, use the getWeather tool; for attraction lookups use \
    searchCatalog; use navigateToView to move them to another part of the app.";

/// The orchestrator's reply for one utterance.
#[derive(Debug, Clone)]
pub struct AssistantResponse {
    /// Unique outbound message id for the avatar channel; never repeated
    /// within a session.
    pub message_id: String,
    /// Final text to speak/display.
    pub text: String,
    /// Set when the model call failed and `text` is the original utterance
    /// passed through. For caller display only; no retry happens here.
    pub error: Option<ModelError>,
}

/// Drives one conversation against a language model.
pub struct ConversationOrchestrator<M: LanguageModel> {
    model: M,
    catalog: Arc<AttractionCatalog>,
    recommender: Recommender,
    context: TourismContext,
    context_note: Option<String>,
    history: VecDeque<ChatTurn>,
    max_history: usize,
    tools: Vec<ToolSpec>,
    tracker: MessageTracker,
    navigation_subscribers: Vec<Sender<NavigationTarget>>,
}

impl<M: LanguageModel> ConversationOrchestrator<M> {
    pub fn new(model: M, catalog: Arc<AttractionCatalog>) -> Self {
        Self {
            model,
            catalog,
            recommender: Recommender::default(),
            context: TourismContext::default(),
            context_note: None,
            history: VecDeque::new(),
            max_history: DEFAULT_HISTORY_TURNS,
            tools: tools::tool_catalog(),
            tracker: MessageTracker::default(),
            navigation_subscribers: Vec::new(),
        }
    }

    /// Override the bounded history window.
    pub fn with_history_limit(mut self, turns: usize) -> Self {
        self.max_history = turns;
        self
    }

    /// Install the traveler's declared preferences, used by the catalog
    /// search tool for ranking.
    pub fn set_tourism_context(&mut self, context: TourismContext) {
        self.context = context;
    }

    /// Subscribe to navigation side-effects requested by tool calls.
    pub fn subscribe_navigation(&mut self) -> Receiver<NavigationTarget> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.navigation_subscribers.push(tx);
        rx
    }

    /// Rebuild the plain-text context note from the current proximity alerts
    /// and top recommendations. The note rides along as leading prompt
    /// context so the model can reference nearby attractions in free-form
    /// replies.
    pub fn refresh_context(
        &mut self,
        alerts: &[&ProximityAlert],
        recommendations: &[Recommendation],
    ) {
        let mut sections: Vec<String> = Vec::new();

        if !alerts.is_empty() {
            let listing: Vec<String> = alerts
                .iter()
                .take(CONTEXT_NOTE_ITEMS)
                .map(|a| {
                    format!(
                        "{} ({}) about {} away",
                        a.attraction.name,
                        a.attraction.category,
                        geo::format_distance(a.distance)
                    )
                })
                .collect();
            sections.push(format!("The traveler is currently near: {}.", listing.join("; ")));
        }

        if !recommendations.is_empty() {
            let listing: Vec<String> = recommendations
                .iter()
                .take(CONTEXT_NOTE_ITEMS)
                .map(|r| format!("{} ({})", r.attraction.name, r.attraction.category))
                .collect();
            sections.push(format!("Good matches for their preferences: {}.", listing.join("; ")));
        }

        self.context_note = (!sections.is_empty()).then(|| sections.join(" "));
    }

    /// The current bounded history window.
    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    /// Reset the conversation (history, context note, message dedup).
    pub fn clear(&mut self) {
        self.history.clear();
        self.context_note = None;
        self.tracker.clear();
    }

    /// Process one user utterance and produce the final spoken/displayed
    /// reply.
    pub async fn submit_utterance(&mut self, text: &str) -> AssistantResponse {
        let message_id = Uuid::new_v4().to_string();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.track_outbound(&message_id);
            return AssistantResponse {
                message_id,
                text: text.to_string(),
                error: None,
            };
        }

        let window = self.prompt_window(trimmed);
        let reply = self.model.converse(&window, &self.tools).await;

        let (final_text, error) = match reply {
            Ok(ModelReply::Text(reply)) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    (enhance_manually(trimmed), None)
                } else {
                    (reply.to_string(), None)
                }
            }
            Ok(ModelReply::ToolUse { name, input }) => {
                match ToolInvocation::parse(&name, &input) {
                    Some(invocation) => (self.dispatch(invocation), None),
                    None => {
                        tracing::warn!("Ignoring unknown tool call '{}'", name);
                        (enhance_manually(trimmed), None)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Model invocation failed, passing utterance through: {}", e);
                // Degrade to passthrough of the untouched utterance; the
                // exchange is not recorded in history.
                self.track_outbound(&message_id);
                return AssistantResponse {
                    message_id,
                    text: text.to_string(),
                    error: Some(e),
                };
            }
        };

        self.history.push_back(ChatTurn::user(trimmed));
        self.history.push_back(ChatTurn::assistant(final_text.clone()));
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        self.track_outbound(&message_id);
        AssistantResponse {
            message_id,
            text: final_text,
            error,
        }
    }

    fn prompt_window(&self, utterance: &str) -> Vec<ChatTurn> {
        let mut window = Vec::with_capacity(self.history.len() + 3);
        window.push(ChatTurn::assistant(PRIMER));
        if let Some(note) = &self.context_note {
            window.push(ChatTurn::assistant(note.clone()));
        }
        window.extend(self.history.iter().cloned());
        window.push(ChatTurn::user(utterance));
        window
    }

    fn dispatch(&mut self, invocation: ToolInvocation) -> String {
        match invocation {
            ToolInvocation::Weather { city, country } => {
                tools::synthesize_weather(&city, country.as_deref())
            }
            ToolInvocation::SearchCatalog { category } => self.search_catalog(&category),
            ToolInvocation::Navigate { view } => {
                self.emit_navigation(view);
                format!("Taking you to the {} view now.", view.label())
            }
        }
    }

    fn search_catalog(&mut self, category: &str) -> String {
        let matches = self.catalog.by_category(category);
        if matches.is_empty() {
            return format!(
                "I couldn't find any {} attractions in the catalog right now.",
                category.trim().to_lowercase()
            );
        }

        // by_category preserves ingestion order, so positional ordinals keep
        // the ranking tie-break faithful to the catalog.
        let candidates: Vec<NearbyAttraction> = matches
            .into_iter()
            .enumerate()
            .map(|(ordinal, attraction)| {
                let distance = self.context.user_location.as_ref().map(|loc| {
                    geo::distance_meters(
                        loc.latitude,
                        loc.longitude,
                        attraction.latitude,
                        attraction.longitude,
                    )
                });
                NearbyAttraction {
                    attraction,
                    distance,
                    ordinal,
                }
            })
            .collect();

        let ranked = self.recommender.rank(&self.context, &candidates);
        let highlights: Vec<&str> = ranked
            .iter()
            .take(3)
            .map(|r| r.attraction.name.as_str())
            .collect();

        self.emit_navigation(NavigationTarget::Map);

        let label = category.trim().to_lowercase();
        if ranked.len() == 1 {
            format!(
                "I found one {} attraction in Singapore: {}. I've pulled it up on the map for you.",
                label, highlights[0]
            )
        } else {
            format!(
                "I found {} {} attractions in Singapore. Highlights include {}. I've pulled them up on the map for you.",
                ranked.len(),
                label,
                highlights.join(", ")
            )
        }
    }

    fn emit_navigation(&mut self, target: NavigationTarget) {
        tracing::debug!("Navigation requested: {}", target.label());
        self.navigation_subscribers.retain(|tx| tx.send(target).is_ok());
    }

    fn track_outbound(&mut self, message_id: &str) {
        // UUIDs make collisions practically impossible; the tracker is the
        // backstop that keeps the guarantee observable.
        if !self.tracker.track(message_id) {
            tracing::warn!("Generated duplicate outbound message id {}", message_id);
        }
    }
}

/// Rule-based fallback when the model yields nothing usable.
fn enhance_manually(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains("where") || lower.contains("what") {
        format!("I'm looking for travel recommendations about: {}", text)
    } else if lower.contains("hotel") || lower.contains("stay") {
        format!("I need help finding accommodation: {}", text)
    } else if lower.contains("flight") || lower.contains("travel") {
        format!("I need travel assistance with: {}", text)
    } else {
        format!("I'd like to know more about: {}", text)
    }
}
