//! Periodic tick scheduling with cancellation

use std::{
    ops::ControlFlow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    runtime::Handle,
    sync::Notify,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

/// Callback run on every scheduled tick; `Break` ends the schedule
pub type TickFn = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

/// Cancel token for a schedule
#[derive(Debug, Clone, Default)]
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl TickHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the schedule. Safe to call more than once.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.wake.notify_one();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Something that can call a function periodically until told to stop
pub trait Scheduler: Send + Sync {
    fn schedule(&self, period: Duration, tick: TickFn) -> TickHandle;
}

/// Scheduler backed by a tokio interval on a spawned task.
///
/// Each schedule runs its callback from a single task, so ticks of one
/// schedule never overlap.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Use the runtime of the calling context. Panics outside a tokio runtime.
    pub fn current() -> Self {
        Self::from_handle(Handle::current())
    }

    pub fn from_handle(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, mut tick: TickFn) -> TickHandle {
        let handle = TickHandle::new();
        let task_handle = handle.clone();
        let period = period.max(Duration::from_millis(1));

        self.runtime.spawn(async move {
            debug!("Tick schedule started every {:?}", period);

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if task_handle.is_cancelled() {
                            break;
                        }
                        if tick().is_break() {
                            task_handle.cancel();
                            break;
                        }
                    }
                    _ = task_handle.wake.notified() => {
                        break;
                    }
                }
            }

            debug!("Tick schedule stopped");
        });

        handle
    }
}
