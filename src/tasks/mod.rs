//! Background tasks module
//!
//! This module contains the tick scheduling that drives running engines, and
//! the terminal tasks the binary runs alongside it.

pub mod driver;
pub mod input;
pub mod render;
pub mod scheduler;

// Re-export main types
pub use driver::TimerDriver;
pub use input::{input_task, KeypadCommand};
pub use render::render_task;
pub use scheduler::{Scheduler, TickFn, TickHandle, TokioScheduler};
