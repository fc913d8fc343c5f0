//! Outbound message deduplication.
//!
//! The avatar channel must never be handed the same message id twice in one
//! session. The tracker is an explicitly constructed guard owned by the
//! orchestrator (not ambient state); tracked ids expire after a TTL so the
//! set stays bounded.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default retention for a tracked message id.
const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Tracks message ids already handed to the output channel.
#[derive(Debug)]
pub struct MessageTracker {
    sent: HashMap<String, Instant>,
    ttl: Duration,
}

impl Default for MessageTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl MessageTracker {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sent: HashMap::new(),
            ttl,
        }
    }

    /// Register a message id. Returns `false` when the id was already sent
    /// inside the TTL window (the message must not go out again).
    pub fn track(&mut self, message_id: &str) -> bool {
        self.prune();
        if self.sent.contains_key(message_id) {
            tracing::warn!("Duplicate message detected: {}", message_id);
            return false;
        }
        self.sent.insert(message_id.to_string(), Instant::now());
        true
    }

    /// Whether an id is currently tracked.
    pub fn is_tracked(&self, message_id: &str) -> bool {
        self.sent
            .get(message_id)
            .is_some_and(|sent_at| sent_at.elapsed() < self.ttl)
    }

    /// Forget everything (session reset).
    pub fn clear(&mut self) {
        self.sent.clear();
    }

    /// Number of ids currently tracked.
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    fn prune(&mut self) {
        let ttl = self.ttl;
        self.sent.retain(|_, sent_at| sent_at.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let mut tracker = MessageTracker::default();
        assert!(tracker.track("msg-1"));
        assert!(!tracker.track("msg-1"));
        assert!(tracker.track("msg-2"));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_expired_ids_pruned() {
        let mut tracker = MessageTracker::new(Duration::from_millis(0));
        assert!(tracker.track("msg-1"));
        // Zero TTL: the id is expired by the next call.
        assert!(tracker.track("msg-1"));
    }

    #[test]
    fn test_clear() {
        let mut tracker = MessageTracker::default();
        tracker.track("msg-1");
        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.is_tracked("msg-1"));
    }
}
