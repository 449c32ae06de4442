//! Stopwatch engine: counts up from zero

use std::sync::Arc;

use tracing::{info, warn};

use super::{TimerEngine, TimerState};
use crate::{
    clock::Clock,
    format::{format_ms, FormattedTime},
    observer::TimerObserver,
};

/// Stopwatch session data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwatchSession {
    /// Elapsed time as of the last pause or tick
    pub elapsed_ms: u64,
    pub state: TimerState,
    /// `now - elapsed` at the moment the run (re)started; only set while running
    pub anchor_ms: Option<u64>,
}

/// Count-up timer with start/pause/resume/reset
pub struct Stopwatch {
    session: StopwatchSession,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn TimerObserver>,
}

impl Stopwatch {
    pub fn new(clock: Arc<dyn Clock>, observer: Arc<dyn TimerObserver>) -> Self {
        Self { session: StopwatchSession::default(), clock, observer }
    }

    pub fn session(&self) -> &StopwatchSession {
        &self.session
    }

    /// Elapsed time, read live from the clock while running
    pub fn elapsed_ms(&self) -> u64 {
        match self.session.anchor_ms {
            Some(anchor) => self.clock.now_ms().saturating_sub(anchor),
            None => self.session.elapsed_ms,
        }
    }

    pub fn state(&self) -> TimerState {
        self.session.state
    }

    pub fn display(&self) -> FormattedTime {
        format_ms(self.elapsed_ms())
    }

    /// Start counting, continuing from any previously accumulated time
    pub fn start(&mut self) {
        if !self.session.state.can_start() {
            warn!("Ignoring stopwatch start while {}", self.session.state);
            return;
        }

        let now = self.clock.now_ms();
        self.session.anchor_ms = Some(now.saturating_sub(self.session.elapsed_ms));
        self.transition(TimerState::Running);
    }

    pub fn pause(&mut self) {
        if !self.session.state.is_running() {
            warn!("Ignoring stopwatch pause while {}", self.session.state);
            return;
        }

        self.session.elapsed_ms = self.elapsed_ms();
        self.session.anchor_ms = None;
        self.transition(TimerState::Paused);
    }

    pub fn resume(&mut self) {
        if self.session.state != TimerState::Paused {
            warn!("Ignoring stopwatch resume while {}", self.session.state);
            return;
        }
        self.start();
    }

    /// Stop and return to zero from any state
    pub fn reset(&mut self) {
        self.session = StopwatchSession::default();
        self.transition(TimerState::Idle);
    }

    pub fn tick(&mut self) {
        if !self.session.state.is_running() {
            return;
        }

        self.session.elapsed_ms = self.elapsed_ms();
        self.observer.on_tick(&format_ms(self.session.elapsed_ms));
    }

    fn transition(&mut self, state: TimerState) {
        self.session.state = state;
        info!("Stopwatch {} at {}", state, format_ms(self.session.elapsed_ms).with_millis);
        self.observer.on_state_change(state);
    }
}

impl TimerEngine for Stopwatch {
    fn start(&mut self) {
        Stopwatch::start(self)
    }

    fn pause(&mut self) {
        Stopwatch::pause(self)
    }

    fn resume(&mut self) {
        Stopwatch::resume(self)
    }

    fn reset(&mut self) {
        Stopwatch::reset(self)
    }

    fn tick(&mut self) {
        Stopwatch::tick(self)
    }

    fn state(&self) -> TimerState {
        Stopwatch::state(self)
    }

    fn display(&self) -> FormattedTime {
        Stopwatch::display(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, observer::TimerEvent, testing::RecordingObserver};

    fn stopwatch() -> (Stopwatch, ManualClock, Arc<RecordingObserver>) {
        let clock = ManualClock::new(1_000_000);
        let observer = Arc::new(RecordingObserver::new());
        let sw = Stopwatch::new(Arc::new(clock.clone()), observer.clone());
        (sw, clock, observer)
    }

    #[test]
    fn test_start_pause_resume_accumulates() {
        let (mut sw, clock, _) = stopwatch();

        sw.start();
        clock.advance(1_500);
        sw.pause();
        assert_eq!(sw.elapsed_ms(), 1_500);

        clock.advance(10_000);
        assert_eq!(sw.elapsed_ms(), 1_500);

        sw.resume();
        clock.advance(500);
        sw.tick();
        assert_eq!(sw.session().elapsed_ms, 2_000);
    }

    #[test]
    fn test_double_start_does_not_reanchor() {
        let (mut sw, clock, observer) = stopwatch();

        sw.start();
        clock.advance(700);
        sw.start();
        clock.advance(300);
        sw.tick();

        assert_eq!(sw.elapsed_ms(), 1_000);
        assert_eq!(observer.state_changes(), vec![TimerState::Running]);
    }

    #[test]
    fn test_illegal_transitions_are_ignored() {
        let (mut sw, _, observer) = stopwatch();

        sw.pause();
        sw.resume();
        sw.tick();

        assert_eq!(sw.state(), TimerState::Idle);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_reset_from_every_state() {
        let (mut sw, clock, _) = stopwatch();

        sw.reset();
        assert_eq!(sw.elapsed_ms(), 0);

        sw.start();
        clock.advance(400);
        sw.reset();
        assert_eq!((sw.state(), sw.elapsed_ms()), (TimerState::Idle, 0));

        sw.start();
        clock.advance(400);
        sw.pause();
        sw.reset();
        assert_eq!((sw.state(), sw.elapsed_ms()), (TimerState::Idle, 0));
        assert_eq!(sw.session().anchor_ms, None);
    }

    #[test]
    fn test_tick_notifies_only_while_running() {
        let (mut sw, clock, observer) = stopwatch();

        sw.start();
        clock.advance(1_234);
        sw.tick();
        sw.pause();
        sw.tick();

        let ticks: Vec<_> = observer
            .events()
            .into_iter()
            .filter_map(|e| match e {
                TimerEvent::Tick { time } => Some(time.with_millis),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec!["00:00:01.234"]);
    }
}
