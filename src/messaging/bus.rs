/// Event bus for pub/sub messaging
///
/// The in-process counterpart of listening for `wizardPageChanged` on the
/// page: [`EventBus::subscribe`] hears every wizard (a document-level
/// listener), [`EventBus::subscribe_to`] hears one dispatcher only (a
/// listener on its container).
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::events::WizardEvent;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    /// `None` listens to every wizard
    dispatcher: Option<String>,
    sender: Sender<WizardEvent>,
}

impl Subscriber {
    fn wants(&self, event: &WizardEvent) -> bool {
        self.dispatcher
            .as_deref()
            .map_or(true, |d| d == event.dispatcher())
    }
}

/// Broadcasts wizard events to subscribers. Clones share subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_id: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive events of every wizard
    pub fn subscribe(&self) -> (Receiver<WizardEvent>, SubscriberId) {
        self.add(None)
    }

    /// Receive events of one wizard only
    pub fn subscribe_to(&self, dispatcher: &str) -> (Receiver<WizardEvent>, SubscriberId) {
        self.add(Some(dispatcher.to_string()))
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.lock().retain(|s| s.id != id);
    }

    /// Deliver `event` to interested subscribers, pruning those whose
    /// receiver is gone
    pub fn publish(&self, event: WizardEvent) {
        tracing::trace!(dispatcher = event.dispatcher(), "Publishing: {}", event.description());

        self.subscribers.lock().retain(|subscriber| {
            !subscriber.wants(&event) || subscriber.sender.send(event.clone()).is_ok()
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn add(&self, dispatcher: Option<String>) -> (Receiver<WizardEvent>, SubscriberId) {
        let (sender, rx) = unbounded();
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push(Subscriber {
            id,
            dispatcher,
            sender,
        });
        (rx, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhanced(dispatcher: &str) -> WizardEvent {
        WizardEvent::Enhanced {
            dispatcher: dispatcher.to_string(),
            length: 3,
        }
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        let (_rx2, id2) = bus.subscribe_to("signup");
        assert_ne!(id, id2);
        assert_eq!(bus.subscriber_count(), 2);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_publish_reaches_all_listeners() {
        let bus = EventBus::new();
        let (rx1, _) = bus.subscribe();
        let (rx2, _) = bus.subscribe();

        bus.publish(enhanced("signup"));

        match rx1.try_recv().unwrap() {
            WizardEvent::Enhanced { length, .. } => assert_eq!(length, 3),
            other => panic!("Wrong event type received: {:?}", other),
        }
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_scoped_subscription_filters_by_dispatcher() {
        let bus = EventBus::new();
        let (signup, _) = bus.subscribe_to("signup");
        let (everything, _) = bus.subscribe();

        bus.publish(enhanced("billing"));
        bus.publish(enhanced("signup"));

        assert_eq!(signup.try_iter().count(), 1);
        assert_eq!(everything.try_iter().count(), 2);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let (rx, _) = bus.subscribe();
        let (_kept, _) = bus.subscribe();
        drop(rx);

        bus.publish(enhanced("signup"));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new();
        let other = bus.clone();

        let (rx, _) = bus.subscribe();
        other.publish(enhanced("signup"));
        assert!(rx.try_recv().is_ok());
        assert_eq!(other.subscriber_count(), 1);
    }
}
