//! Test doubles for driving the engines without real time
//!
//! Pair a [`ManualClock`] with a [`ManualScheduler`] to step a timer through
//! simulated time, and use a [`RecordingObserver`] to assert on what it
//! reported.

use std::{
    ops::ControlFlow,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

pub use crate::clock::ManualClock;
use crate::{
    error::RejectReason,
    format::FormattedTime,
    observer::{TimerEvent, TimerObserver},
    state::TimerState,
    tasks::{Scheduler, TickFn, TickHandle},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Observer that keeps every notification in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<TimerEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TimerEvent> {
        lock(&self.events).clone()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    pub fn state_changes(&self) -> Vec<TimerState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TimerEvent::StateChanged { state } => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Tick payloads as `HH:MM:SS.mmm`
    pub fn ticks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TimerEvent::Tick { time } => Some(time.with_millis),
                _ => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> Vec<RejectReason> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TimerEvent::Rejected { reason } => Some(reason),
                _ => None,
            })
            .collect()
    }

    pub fn expired_count(&self) -> usize {
        self.events().iter().filter(|e| **e == TimerEvent::Expired).count()
    }

    fn push(&self, event: TimerEvent) {
        lock(&self.events).push(event);
    }
}

impl TimerObserver for RecordingObserver {
    fn on_tick(&self, time: &FormattedTime) {
        self.push(TimerEvent::Tick { time: time.clone() });
    }

    fn on_state_change(&self, state: TimerState) {
        self.push(TimerEvent::StateChanged { state });
    }

    fn on_expired(&self) {
        self.push(TimerEvent::Expired);
    }

    fn on_rejected(&self, reason: RejectReason) {
        self.push(TimerEvent::Rejected { reason });
    }

    fn on_entry_changed(&self, entry: &FormattedTime) {
        self.push(TimerEvent::EntryChanged { entry: entry.clone() });
    }

    fn on_entry_requested(&self) {
        self.push(TimerEvent::EntryRequested);
    }
}

struct Scheduled {
    period: Duration,
    handle: TickHandle,
    tick: TickFn,
}

/// Scheduler that only ticks when [`fire`](ManualScheduler::fire) is called
#[derive(Default)]
pub struct ManualScheduler {
    scheduled: Mutex<Vec<Scheduled>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live schedule once, in the order they were registered.
    /// Returns how many callbacks ran.
    pub fn fire(&self) -> usize {
        let mut pending = std::mem::take(&mut *lock(&self.scheduled));
        let mut fired = 0;

        pending.retain_mut(|entry| {
            if entry.handle.is_cancelled() {
                return false;
            }
            fired += 1;
            match (entry.tick)() {
                ControlFlow::Continue(()) => !entry.handle.is_cancelled(),
                ControlFlow::Break(()) => {
                    entry.handle.cancel();
                    false
                }
            }
        });

        let mut scheduled = lock(&self.scheduled);
        pending.append(&mut scheduled);
        *scheduled = pending;
        fired
    }

    /// Number of schedules that have not been cancelled
    pub fn live_count(&self) -> usize {
        lock(&self.scheduled).iter().filter(|entry| !entry.handle.is_cancelled()).count()
    }

    /// Periods of the live schedules
    pub fn periods(&self) -> Vec<Duration> {
        lock(&self.scheduled)
            .iter()
            .filter(|entry| !entry.handle.is_cancelled())
            .map(|entry| entry.period)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, period: Duration, tick: TickFn) -> TickHandle {
        let handle = TickHandle::new();
        lock(&self.scheduled).push(Scheduled { period, handle: handle.clone(), tick });
        handle
    }
}
