//! Countdown engine: counts down from a duration entered on the keypad

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{digit_buffer::DigitBuffer, TimerEngine, TimerState};
use crate::{
    clock::Clock,
    error::{Result, TimerError},
    format::{format_ms, FormattedTime},
    observer::TimerObserver,
};

/// Countdown session data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownSession {
    /// Duration confirmed with "Set"; zero means unconfigured
    pub configured_ms: u64,
    /// Remaining time as of the last pause or tick
    pub remaining_ms: u64,
    pub state: TimerState,
    /// Guards the expiration notification to once per run
    pub expired_notified: bool,
    /// Clock reading and remaining time when the current run started
    anchor: Option<(u64, u64)>,
}

/// Count-down timer that owns its keypad entry buffer
pub struct Countdown {
    session: CountdownSession,
    entry: DigitBuffer,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn TimerObserver>,
}

impl Countdown {
    pub fn new(clock: Arc<dyn Clock>, observer: Arc<dyn TimerObserver>) -> Self {
        Self::with_entry(DigitBuffer::new(), clock, observer)
    }

    /// Create a countdown around a pre-built entry buffer (for a custom ceiling)
    pub fn with_entry(
        entry: DigitBuffer,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn TimerObserver>,
    ) -> Self {
        Self { session: CountdownSession::default(), entry, clock, observer }
    }

    pub fn session(&self) -> &CountdownSession {
        &self.session
    }

    pub fn configured_ms(&self) -> u64 {
        self.session.configured_ms
    }

    /// Remaining time, read live from the clock while running
    pub fn remaining_ms(&self) -> u64 {
        match self.session.anchor {
            Some((anchor, remaining_at_anchor)) => {
                let elapsed = self.clock.now_ms().saturating_sub(anchor);
                remaining_at_anchor.saturating_sub(elapsed)
            }
            None => self.session.remaining_ms,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.session.configured_ms > 0
    }

    pub fn state(&self) -> TimerState {
        self.session.state
    }

    /// Remaining time once configured, otherwise the duration being typed
    pub fn display(&self) -> FormattedTime {
        if self.is_configured() {
            format_ms(self.remaining_ms())
        } else {
            format_ms(self.entry.current_duration())
        }
    }

    pub fn entry(&self) -> &DigitBuffer {
        &self.entry
    }

    /// Duration the keypad buffer currently spells out
    pub fn entry_duration(&self) -> u64 {
        self.entry.current_duration()
    }

    pub fn press_digit(&mut self, digit: u8) -> Result<()> {
        if self.session.state.is_running() {
            warn!("Ignoring digit entry while countdown is running");
            return Ok(());
        }
        self.entry.press_digit(digit)?;
        self.entry_changed();
        Ok(())
    }

    pub fn backspace(&mut self) {
        if self.session.state.is_running() {
            warn!("Ignoring backspace while countdown is running");
            return;
        }
        if self.entry.backspace().is_some() {
            self.entry_changed();
        }
    }

    pub fn clear_entry(&mut self) {
        if self.session.state.is_running() {
            warn!("Ignoring entry clear while countdown is running");
            return;
        }
        self.entry.clear();
        self.entry_changed();
    }

    /// "Set": validate the keypad entry and configure the countdown with it.
    ///
    /// On success the entry buffer is emptied. On overflow the buffer is
    /// emptied too; on an invalid duration it is kept for correction.
    pub fn confirm_entry(&mut self) -> Result<()> {
        if self.session.state.is_running() {
            warn!("Ignoring duration entry while countdown is running");
            return Ok(());
        }

        let duration = match self.entry.confirm() {
            Ok(duration) => duration,
            Err(e) => {
                if matches!(e, TimerError::DurationOverflow { .. }) {
                    self.entry_changed();
                }
                return Err(self.reject(e));
            }
        };

        self.configure(duration)?;
        self.entry.clear();
        Ok(())
    }

    /// Set the countdown duration; ignored while running.
    ///
    /// Rejects zero with `InvalidDuration`, and anything above the entry
    /// buffer's ceiling with `DurationOverflow` (which also empties the
    /// buffer). A rejected call leaves the previous configuration untouched.
    pub fn configure(&mut self, duration_ms: u64) -> Result<()> {
        if self.session.state.is_running() {
            warn!("Ignoring countdown configure while running");
            return Ok(());
        }

        if duration_ms == 0 {
            return Err(self.reject(TimerError::InvalidDuration));
        }

        if let Some(max_ms) = self.entry.ceiling_ms() {
            if duration_ms > max_ms {
                self.entry.clear();
                self.entry_changed();
                return Err(self.reject(TimerError::DurationOverflow {
                    requested_ms: duration_ms,
                    max_ms,
                }));
            }
        }

        self.session = CountdownSession {
            configured_ms: duration_ms,
            remaining_ms: duration_ms,
            ..CountdownSession::default()
        };
        self.transition(TimerState::Idle);
        Ok(())
    }

    /// Start counting down from the remaining time.
    ///
    /// With nothing left to count (never configured, or already expired) the
    /// session is dropped and the caller is asked for a new duration. Digits
    /// typed but not yet confirmed stay in the entry buffer.
    pub fn start(&mut self) {
        if self.session.state.is_running() {
            warn!("Ignoring countdown start while running");
            return;
        }

        if self.session.remaining_ms == 0 {
            warn!("Countdown start with no time set, returning to entry");
            self.request_entry();
            return;
        }

        if !self.session.state.can_start() {
            warn!("Ignoring countdown start while {}", self.session.state);
            return;
        }

        self.session.anchor = Some((self.clock.now_ms(), self.session.remaining_ms));
        self.transition(TimerState::Running);
    }

    pub fn pause(&mut self) {
        if !self.session.state.is_running() {
            warn!("Ignoring countdown pause while {}", self.session.state);
            return;
        }

        if self.settle() {
            return;
        }
        self.session.anchor = None;
        self.transition(TimerState::Paused);
    }

    pub fn resume(&mut self) {
        if self.session.state != TimerState::Paused {
            warn!("Ignoring countdown resume while {}", self.session.state);
            return;
        }
        self.start();
    }

    /// Forget the configured duration and return to keypad entry, from any state
    pub fn clear(&mut self) {
        self.entry.clear();
        self.request_entry();
    }

    /// Drop the session and go back to keypad entry, keeping any typed digits
    fn request_entry(&mut self) {
        self.session = CountdownSession::default();
        self.transition(TimerState::Idle);
        self.observer.on_entry_requested();
    }

    pub fn tick(&mut self) {
        if !self.session.state.is_running() {
            return;
        }

        if !self.settle() {
            self.observer.on_tick(&format_ms(self.session.remaining_ms));
        }
    }

    /// Fold the time since the anchor into `remaining_ms`, expiring at zero.
    /// Returns true if the countdown expired.
    fn settle(&mut self) -> bool {
        self.session.remaining_ms = self.remaining_ms();
        if self.session.remaining_ms > 0 {
            return false;
        }

        self.session.anchor = None;
        self.observer.on_tick(&format_ms(0));
        self.transition(TimerState::Expired);

        if !self.session.expired_notified {
            self.session.expired_notified = true;
            info!("Countdown of {}ms expired", self.session.configured_ms);
            self.observer.on_expired();
        } else {
            debug!("Countdown expiry already notified");
        }
        true
    }

    fn reject(&self, error: TimerError) -> TimerError {
        warn!("Rejected countdown duration: {}", error);
        if let Some(reason) = error.reject_reason() {
            self.observer.on_rejected(reason);
        }
        error
    }

    fn entry_changed(&self) {
        self.observer.on_entry_changed(&format_ms(self.entry.current_duration()));
    }

    fn transition(&mut self, state: TimerState) {
        self.session.state = state;
        info!(
            "Countdown {} with {} remaining",
            state,
            format_ms(self.session.remaining_ms).with_millis
        );
        self.observer.on_state_change(state);
    }
}

impl TimerEngine for Countdown {
    fn start(&mut self) {
        Countdown::start(self)
    }

    fn pause(&mut self) {
        Countdown::pause(self)
    }

    fn resume(&mut self) {
        Countdown::resume(self)
    }

    fn reset(&mut self) {
        self.clear()
    }

    fn tick(&mut self) {
        Countdown::tick(self)
    }

    fn state(&self) -> TimerState {
        Countdown::state(self)
    }

    fn display(&self) -> FormattedTime {
        Countdown::display(self)
    }
}
