/// Event bus for cue notifications
///
/// Every subscriber owns an unbounded receiver. Publishing fans an event out
/// to all live receivers and never blocks the tick loop; a subscriber that
/// dropped its receiver is forgotten on the next publish.
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::events::Event;

/// Shared handle to the subscriber list; clones publish to the same list
#[derive(Clone, Default)]
pub struct EventBus {
    senders: Arc<Mutex<Vec<Sender<Event>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        self.senders.lock().push(tx);
        rx
    }

    pub fn publish(&self, event: Event) {
        let mut senders = self.senders.lock();
        let before = senders.len();
        senders.retain(|sender| {
            !matches!(
                sender.try_send(event.clone()),
                Err(TrySendError::Disconnected(_))
            )
        });

        if senders.len() < before {
            tracing::debug!("Dropped {} closed subscriber(s)", before - senders.len());
        }
    }

    /// Subscribers still holding their receiver as of the last publish
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::Channel;
    use crate::game::Side;

    fn played(sound: &str) -> Event {
        Event::CuePlayed {
            side: Side::P1,
            channel: Channel::Action,
            sound: sound.to_string(),
            frame: 7,
        }
    }

    #[test]
    fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        bus.publish(played("STAND_A.wav"));

        match rx.try_recv().unwrap() {
            Event::CuePlayed { sound, frame, .. } => {
                assert_eq!(sound, "STAND_A.wav");
                assert_eq!(frame, 7);
            }
            _ => panic!("Wrong event type received"),
        }
    }

    #[test]
    fn test_every_subscriber_gets_a_copy() {
        let bus = EventBus::new();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        bus.publish(Event::RoundReset { side: Side::P2 });

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_closed_subscriber_is_dropped_on_publish() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(played("DASH.wav"));
        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let rx = bus.subscribe();

        clone.publish(played("LANDING.wav"));
        assert_eq!(clone.subscriber_count(), 1);
        assert!(rx.try_recv().is_ok());
    }
}
