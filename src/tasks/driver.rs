//! Ties an engine to a scheduler so it ticks exactly while it is running

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use tracing::{debug, warn};

use super::scheduler::{Scheduler, TickHandle};
use crate::{
    format::FormattedTime,
    state::{TimerEngine, TimerState},
};

struct Slot<E> {
    engine: E,
    /// Bumped whenever the live schedule is cancelled; stale callbacks compare against it
    generation: u64,
    ticker: Option<TickHandle>,
}

/// Owns an engine and its tick schedule.
///
/// Every control call goes through the driver, which afterwards makes sure
/// a running engine has exactly one live schedule and any other engine has
/// none. Control calls and tick callbacks serialize on the same lock, so no
/// tick can land after `pause`/`reset` returns.
///
/// The engine notifies its observer while that lock is held. An observer
/// must not call back into the driver from a notification; doing so
/// deadlocks. React to events after the call returns instead, e.g. by
/// draining a [`ChannelObserver`](crate::observer::ChannelObserver).
pub struct TimerDriver<E: TimerEngine + 'static> {
    slot: Arc<Mutex<Slot<E>>>,
    scheduler: Arc<dyn Scheduler>,
    period: Duration,
}

impl<E: TimerEngine + 'static> TimerDriver<E> {
    pub fn new(engine: E, scheduler: Arc<dyn Scheduler>, period: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot { engine, generation: 0, ticker: None })),
            scheduler,
            period,
        }
    }

    pub fn start(&self) {
        self.with_engine(|engine| engine.start())
    }

    pub fn pause(&self) {
        self.with_engine(|engine| engine.pause())
    }

    pub fn resume(&self) {
        self.with_engine(|engine| engine.resume())
    }

    pub fn reset(&self) {
        self.with_engine(|engine| engine.reset())
    }

    /// Run an operation on the engine, then reconcile the tick schedule
    pub fn with_engine<R>(&self, op: impl FnOnce(&mut E) -> R) -> R {
        let mut slot = lock(&self.slot);
        let result = op(&mut slot.engine);
        self.reconcile(&mut slot);
        result
    }

    pub fn state(&self) -> TimerState {
        lock(&self.slot).engine.state()
    }

    pub fn display(&self) -> FormattedTime {
        lock(&self.slot).engine.display()
    }

    /// Check if a tick schedule is currently live
    pub fn is_ticking(&self) -> bool {
        lock(&self.slot).ticker.is_some()
    }

    fn reconcile(&self, slot: &mut Slot<E>) {
        let running = slot.engine.state().is_running();

        match (running, slot.ticker.is_some()) {
            (true, false) => {
                let generation = slot.generation;
                let weak = Arc::downgrade(&self.slot);
                let handle = self.scheduler.schedule(
                    self.period,
                    Box::new(move || tick_once(&weak, generation)),
                );
                slot.ticker = Some(handle);
                debug!("Scheduled ticks every {:?}", self.period);
            }
            (false, true) => {
                cancel(slot);
                debug!("Cancelled ticks");
            }
            _ => {}
        }
    }
}

impl<E: TimerEngine + 'static> Drop for TimerDriver<E> {
    fn drop(&mut self) {
        cancel(&mut lock(&self.slot));
    }
}

fn tick_once<E: TimerEngine>(slot: &Weak<Mutex<Slot<E>>>, generation: u64) -> ControlFlow<()> {
    let Some(slot) = slot.upgrade() else {
        return ControlFlow::Break(());
    };
    let mut slot = lock(&slot);

    if slot.generation != generation {
        return ControlFlow::Break(());
    }

    slot.engine.tick();

    if slot.engine.state().is_running() {
        ControlFlow::Continue(())
    } else {
        cancel(&mut slot);
        ControlFlow::Break(())
    }
}

fn cancel<E>(slot: &mut Slot<E>) {
    if let Some(handle) = slot.ticker.take() {
        handle.cancel();
        slot.generation += 1;
    }
}

fn lock<E>(slot: &Mutex<Slot<E>>) -> MutexGuard<'_, Slot<E>> {
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("Timer lock poisoned, recovering");
        poisoned.into_inner()
    })
}
