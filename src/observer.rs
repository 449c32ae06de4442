//! Observer contract between the timer engines and whatever displays them

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::{error::RejectReason, format::FormattedTime, state::TimerState};

/// Sink for time updates and lifecycle transitions.
///
/// Engines hold an `Arc<dyn TimerObserver>` and call it synchronously from
/// whichever thread drives them. Under a `TimerDriver` that happens with the
/// driver's lock held, so implementations must not call back into the driver.
pub trait TimerObserver: Send + Sync {
    /// Called on every tick while the engine is running
    fn on_tick(&self, time: &FormattedTime);

    /// Called on every successful state transition
    fn on_state_change(&self, state: TimerState);

    /// Countdown only, once per run that reaches zero
    fn on_expired(&self);

    fn on_rejected(&self, reason: RejectReason);

    /// The countdown's digit entry changed
    fn on_entry_changed(&self, _entry: &FormattedTime) {}

    /// The countdown went back to collecting a duration from the keypad
    fn on_entry_requested(&self) {}
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TimerObserver for NoopObserver {
    fn on_tick(&self, _time: &FormattedTime) {}
    fn on_state_change(&self, _state: TimerState) {}
    fn on_expired(&self) {}
    fn on_rejected(&self, _reason: RejectReason) {}
}

/// One observer notification, as a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Tick { time: FormattedTime },
    StateChanged { state: TimerState },
    Expired,
    Rejected { reason: RejectReason },
    EntryChanged { entry: FormattedTime },
    EntryRequested,
}

/// Observer that fans every notification out on a broadcast channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: broadcast::Sender<TimerEvent>,
}

impl ChannelObserver {
    /// Create an observer with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.tx.subscribe()
    }

    fn send(&self, event: TimerEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("No subscribers for timer event: {:?}", e.0);
        }
    }
}

impl TimerObserver for ChannelObserver {
    fn on_tick(&self, time: &FormattedTime) {
        self.send(TimerEvent::Tick { time: time.clone() });
    }

    fn on_state_change(&self, state: TimerState) {
        self.send(TimerEvent::StateChanged { state });
    }

    fn on_expired(&self) {
        self.send(TimerEvent::Expired);
    }

    fn on_rejected(&self, reason: RejectReason) {
        self.send(TimerEvent::Rejected { reason });
    }

    fn on_entry_changed(&self, entry: &FormattedTime) {
        self.send(TimerEvent::EntryChanged { entry: entry.clone() });
    }

    fn on_entry_requested(&self) {
        self.send(TimerEvent::EntryRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_ms;

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let observer = ChannelObserver::new(16);
        let mut rx = observer.subscribe();

        observer.on_state_change(TimerState::Running);
        observer.on_tick(&format_ms(1_500));
        observer.on_expired();

        assert_eq!(
            rx.try_recv().unwrap(),
            TimerEvent::StateChanged { state: TimerState::Running }
        );
        assert_eq!(rx.try_recv().unwrap(), TimerEvent::Tick { time: format_ms(1_500) });
        assert_eq!(rx.try_recv().unwrap(), TimerEvent::Expired);
    }

    #[test]
    fn test_channel_observer_without_subscribers_does_not_panic() {
        let observer = ChannelObserver::new(4);
        observer.on_rejected(RejectReason::InvalidDuration);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(TimerEvent::Rejected {
            reason: RejectReason::DurationOverflow,
        })
        .unwrap();
        assert_eq!(json["event"], "rejected");
        assert_eq!(json["reason"], "duration_overflow");

        let json = serde_json::to_value(TimerEvent::StateChanged { state: TimerState::Paused })
            .unwrap();
        assert_eq!(json["state"], "paused");
    }
}
