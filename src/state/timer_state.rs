//! Timer lifecycle state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by both timer engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Initial state, and the state after reset/clear
    #[default]
    Idle,
    Running,
    Paused,
    /// Countdown reached zero; only reachable from `Running`
    Expired,
}

impl TimerState {
    /// Check if the timer is accumulating time
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Check if `start`/`resume` is permitted from this state
    pub fn can_start(&self) -> bool {
        matches!(self, TimerState::Idle | TimerState::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Expired => "expired",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
