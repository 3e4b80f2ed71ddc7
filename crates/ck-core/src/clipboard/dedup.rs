//! Adjacent-duplicate suppression for captured clipboard text.
//!
//! The gate only remembers the hash of the most recently *persisted* content.
//! It is not a historical index: `a, b, a` is accepted three times, `a, a` once.
//! The history store performs its own exact-match dedup on insert, so losing
//! the gate state (restart, `reset`) never produces duplicate rows.

use std::sync::Mutex;

use super::hash::ContentHash;

/// 相邻重复内容过滤器。
#[derive(Debug, Default)]
pub struct DedupGate {
    last_persisted: Mutex<Option<ContentHash>>,
}

impl DedupGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` iff `text` hashes to the last persisted content.
    pub fn should_persist(&self, text: &str) -> bool {
        let hash = ContentHash::of_text(text);
        let guard = self
            .last_persisted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref() != Some(&hash)
    }

    /// Record `text` as persisted. Call only after a successful store insert.
    pub fn record_persisted(&self, text: &str) {
        let hash = ContentHash::of_text(text);
        let mut guard = self
            .last_persisted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(hash);
    }

    pub fn reset(&self) {
        let mut guard = self
            .last_persisted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }

    pub fn last_persisted(&self) -> Option<ContentHash> {
        self.last_persisted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_accepts_everything() {
        let gate = DedupGate::new();
        assert!(gate.should_persist("hello"));
        assert!(gate.last_persisted().is_none());
    }

    #[test]
    fn rejects_text_identical_to_last_persisted() {
        let gate = DedupGate::new();
        for text in ["hello", "", "multi\nline", "ünïcödé"] {
            gate.record_persisted(text);
            assert!(!gate.should_persist(text), "{text:?} should be suppressed");
        }
    }

    #[test]
    fn accepts_any_other_text_after_persist() {
        let gate = DedupGate::new();
        gate.record_persisted("hello");
        assert!(gate.should_persist("hello "));
        assert!(gate.should_persist("Hello"));
        assert!(gate.should_persist("world"));
    }

    #[test]
    fn only_suppresses_the_adjacent_duplicate() {
        let gate = DedupGate::new();
        gate.record_persisted("a");
        gate.record_persisted("b");
        assert!(gate.should_persist("a"));
        assert!(!gate.should_persist("b"));
    }

    #[test]
    fn should_persist_does_not_mutate_state() {
        let gate = DedupGate::new();
        gate.record_persisted("a");
        assert!(gate.should_persist("b"));
        assert!(gate.should_persist("b"));
        assert!(!gate.should_persist("a"));
    }

    #[test]
    fn reset_forgets_last_persisted() {
        let gate = DedupGate::new();
        gate.record_persisted("a");
        gate.reset();
        assert!(gate.should_persist("a"));
    }
}
