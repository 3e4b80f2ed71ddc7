use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifies a capture channel in logs and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    PrivilegedService,
    ElevatedShell,
    Passive,
    FocusSteal,
}

impl StrategyId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::PrivilegedService => "privileged_service",
            StrategyId::ElevatedShell => "elevated_shell",
            StrategyId::Passive => "passive",
            StrategyId::FocusSteal => "focus_steal",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single strategy invocation. Never persisted.
///
/// 单次捕获策略调用的结果（不持久化）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub text: Option<String>,
    pub source: StrategyId,
}

/// The one normalisation every channel goes through: surrounding whitespace
/// is dropped and whitespace-only text is no content.
pub fn normalize_captured_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CaptureResult {
    /// Text is normalised with [`normalize_captured_text`].
    pub fn new(source: StrategyId, text: Option<String>) -> Self {
        Self {
            text: text.as_deref().and_then(normalize_captured_text),
            source,
        }
    }

    pub fn none(source: StrategyId) -> Self {
        Self { text: None, source }
    }

    pub fn is_some(&self) -> bool {
        self.text.is_some()
    }
}

/// One way of reading the current clipboard text.
///
/// 读取当前剪贴板文本的一种方式。
///
/// # Contract / 约定
/// - `attempt_read` never fails: timeouts, missing permissions and lower-level
///   errors all come back as `CaptureResult { text: None, .. }`.
/// - `attempt_read` must finish within roughly `timeout`.
/// - `is_available` is a cheap, non-blocking check.
#[async_trait]
pub trait CaptureStrategy: Send + Sync {
    fn id(&self) -> StrategyId;

    fn is_available(&self) -> bool;

    async fn attempt_read(&self, timeout: Duration) -> CaptureResult;
}

#[derive(Clone)]
pub struct RankedStrategy {
    pub strategy: Arc<dyn CaptureStrategy>,
    pub timeout: Duration,
}

impl fmt::Debug for RankedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedStrategy")
            .field("id", &self.strategy.id())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Strategies in preference order, most reliable first.
///
/// Built once at wiring time. New channels are added by appending, callers
/// never branch on the concrete strategy type.
#[derive(Debug, Clone, Default)]
pub struct StrategyChain {
    entries: Vec<RankedStrategy>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, strategy: Arc<dyn CaptureStrategy>, timeout: Duration) -> Self {
        self.entries.push(RankedStrategy { strategy, timeout });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedStrategy> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<StrategyId> {
        self.entries.iter().map(|e| e.strategy.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(StrategyId);

    #[async_trait]
    impl CaptureStrategy for Fixed {
        fn id(&self) -> StrategyId {
            self.0
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn attempt_read(&self, _timeout: Duration) -> CaptureResult {
            CaptureResult::none(self.0)
        }
    }

    #[test]
    fn chain_keeps_insertion_order() {
        let chain = StrategyChain::new()
            .then(Arc::new(Fixed(StrategyId::PrivilegedService)), Duration::from_millis(1))
            .then(Arc::new(Fixed(StrategyId::ElevatedShell)), Duration::from_millis(2))
            .then(Arc::new(Fixed(StrategyId::Passive)), Duration::from_millis(3));

        assert_eq!(
            chain.ids(),
            vec![
                StrategyId::PrivilegedService,
                StrategyId::ElevatedShell,
                StrategyId::Passive
            ]
        );
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn empty_text_is_no_content() {
        let result = CaptureResult::new(StrategyId::Passive, Some(String::new()));
        assert!(!result.is_some());
        let blank = CaptureResult::new(StrategyId::Passive, Some(" \n\t".to_string()));
        assert!(!blank.is_some());
    }

    #[test]
    fn every_channel_trims_the_same_way() {
        let passive = CaptureResult::new(StrategyId::Passive, Some("foo\n".to_string()));
        let shell = CaptureResult::new(StrategyId::ElevatedShell, Some("  foo".to_string()));
        assert_eq!(passive.text.as_deref(), Some("foo"));
        assert_eq!(passive.text, shell.text);
        assert_eq!(
            normalize_captured_text("  two\nlines \n").as_deref(),
            Some("two\nlines")
        );
    }

    #[test]
    fn strategy_id_serializes_snake_case() {
        let json = serde_json::to_string(&StrategyId::FocusSteal).unwrap();
        assert_eq!(json, "\"focus_steal\"");
        assert_eq!(StrategyId::ElevatedShell.to_string(), "elevated_shell");
    }
}
