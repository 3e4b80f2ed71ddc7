//! Concrete capture strategies, in canonical rank order.

mod elevated_shell;
mod focus_steal;
mod passive;
mod privileged;

use std::sync::Arc;

use ck_core::settings::CaptureSettings;
use ck_core::StrategyChain;

pub use elevated_shell::ElevatedShellStrategy;
pub use focus_steal::FocusStealStrategy;
pub use passive::{read_passive, PassiveStrategy};
pub use privileged::PrivilegedServiceStrategy;

/// Chain used by polling and bursts: privileged, elevated shell, passive.
pub fn background_chain(
    settings: &CaptureSettings,
    privileged: Arc<PrivilegedServiceStrategy>,
    elevated_shell: Arc<ElevatedShellStrategy>,
    passive: Arc<PassiveStrategy>,
) -> StrategyChain {
    StrategyChain::new()
        .then(privileged, settings.privileged_timeout())
        .then(elevated_shell, settings.shell_timeout())
        .then(passive, settings.passive_timeout())
}

/// Chain used by user-tap one-shot captures.
pub fn one_shot_chain(settings: &CaptureSettings, focus_steal: Arc<FocusStealStrategy>) -> StrategyChain {
    StrategyChain::new().then(focus_steal, settings.focus_steal_timeout())
}
