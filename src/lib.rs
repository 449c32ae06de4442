//! Dual Timer - stopwatch and countdown engines
//!
//! This library provides two independent timer engines sharing one control
//! lifecycle (idle, running, paused, expired), a keypad buffer that turns
//! digit presses into a countdown duration, and the scheduling glue that
//! ticks a running engine. Presentation is left to an injected
//! [`TimerObserver`].

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod observer;
pub mod state;
pub mod tasks;
pub mod testing;
pub mod utils;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{RejectReason, TimerError};
pub use format::{format_ms, FormattedTime};
pub use observer::{ChannelObserver, NoopObserver, TimerEvent, TimerObserver};
pub use state::{Countdown, DigitBuffer, Mode, Stopwatch, Timer, TimerEngine, TimerState};
pub use tasks::{Scheduler, TickHandle, TimerDriver, TokioScheduler};
pub use utils::signals::shutdown_signal;
