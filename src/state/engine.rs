//! Shared capability set of the two timer engines

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Countdown, Stopwatch, TimerState};
use crate::format::FormattedTime;

/// Control lifecycle common to the stopwatch and the countdown.
///
/// None of these operations fail. Calls that the current state does not
/// permit are logged at warn level and ignored, so rapid double clicks from
/// a UI are harmless.
pub trait TimerEngine: Send {
    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn reset(&mut self);

    /// Recompute time from the clock and notify the observer; no-op unless running
    fn tick(&mut self);

    fn state(&self) -> TimerState;

    /// What the display should show right now
    fn display(&self) -> FormattedTime;
}

/// Which engine the user picked on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Stopwatch,
    Countdown,
}

/// Either engine, chosen at run time
pub enum Timer {
    Stopwatch(Stopwatch),
    Countdown(Countdown),
}

impl Timer {
    pub fn mode(&self) -> Mode {
        match self {
            Timer::Stopwatch(_) => Mode::Stopwatch,
            Timer::Countdown(_) => Mode::Countdown,
        }
    }

    pub fn as_countdown_mut(&mut self) -> Option<&mut Countdown> {
        match self {
            Timer::Countdown(countdown) => Some(countdown),
            Timer::Stopwatch(_) => None,
        }
    }
}

impl From<Stopwatch> for Timer {
    fn from(stopwatch: Stopwatch) -> Self {
        Timer::Stopwatch(stopwatch)
    }
}

impl From<Countdown> for Timer {
    fn from(countdown: Countdown) -> Self {
        Timer::Countdown(countdown)
    }
}

macro_rules! dispatch {
    ($self:ident, $engine:ident => $body:expr) => {
        match $self {
            Timer::Stopwatch($engine) => $body,
            Timer::Countdown($engine) => $body,
        }
    };
}

impl TimerEngine for Timer {
    fn start(&mut self) {
        dispatch!(self, e => e.start())
    }

    fn pause(&mut self) {
        dispatch!(self, e => e.pause())
    }

    fn resume(&mut self) {
        dispatch!(self, e => e.resume())
    }

    fn reset(&mut self) {
        dispatch!(self, e => TimerEngine::reset(e))
    }

    fn tick(&mut self) {
        dispatch!(self, e => e.tick())
    }

    fn state(&self) -> TimerState {
        dispatch!(self, e => e.state())
    }

    fn display(&self) -> FormattedTime {
        dispatch!(self, e => e.display())
    }
}
