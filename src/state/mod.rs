//! Timer state and engines
//!
//! This module contains the session state machines for both timer modes and
//! the keypad buffer used to enter countdown durations.

pub mod countdown;
pub mod digit_buffer;
pub mod engine;
pub mod stopwatch;
pub mod timer_state;

// Re-export main types
pub use countdown::{Countdown, CountdownSession};
pub use digit_buffer::{DigitBuffer, MAX_DIGITS, MAX_DURATION_MS};
pub use engine::{Mode, Timer, TimerEngine};
pub use stopwatch::{Stopwatch, StopwatchSession};
pub use timer_state::TimerState;
