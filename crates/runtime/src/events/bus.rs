//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use combat_core::LifecycleEvent;

use crate::replication::ReplicationNotice;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat, round and turn boundaries
    Lifecycle,
    /// Change notices the host sends to observers
    Replication,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Lifecycle(LifecycleEvent),
    Replication(ReplicationNotice),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Replication(_) => Topic::Replication,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks: slow subscribers lag
/// and see `RecvError::Lagged` instead of stalling the host.
#[derive(Clone)]
pub struct EventBus {
    lifecycle: broadcast::Sender<Event>,
    replication: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lifecycle: broadcast::channel(capacity).0,
            replication: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Lifecycle => &self.lifecycle,
            Topic::Replication => &self.replication,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_events_by_topic() {
        let bus = EventBus::with_capacity(4);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut replication = bus.subscribe(Topic::Replication);

        bus.publish(Event::Lifecycle(LifecycleEvent::RoundStarted { round: 2 }));
        bus.publish(Event::Replication(ReplicationNotice::RoundChanged));

        assert_eq!(
            lifecycle.recv().await.unwrap(),
            Event::Lifecycle(LifecycleEvent::RoundStarted { round: 2 })
        );
        assert_eq!(
            replication.recv().await.unwrap(),
            Event::Replication(ReplicationNotice::RoundChanged)
        );
        assert!(lifecycle.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Replication(ReplicationNotice::TurnChanged));
    }
}
