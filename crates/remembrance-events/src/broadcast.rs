//! Production `EventBus`: an in-process Tokio broadcast channel.

use async_trait::async_trait;
use remembrance_domain::events::DomainEvent;
use remembrance_domain::ports::events::{EventBus, EventSubscription};
use remembrance_domain::Result;
use tokio::sync::broadcast;
use tracing::debug;

/// Default buffer capacity; a subscriber that falls this far behind
/// drops the oldest buffered events rather than stalling the publisher.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process pub/sub over a Tokio broadcast channel. Publishing never
/// blocks on subscribers and never fails because nobody is listening.
pub struct BroadcastEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventBus {
    /// A bus with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A bus with a caller-chosen buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Number of currently live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<()> {
        match self.sender.send(event.clone()) {
            Ok(count) => debug!(kind = event.kind(), subscribers = count, "published event"),
            Err(_no_subscribers) => debug!(kind = event.kind(), "published event with no subscribers"),
        }
        Ok(())
    }

    async fn subscribe(&self) -> Box<dyn EventSubscription> {
        Box::new(BroadcastSubscription {
            receiver: self.sender.subscribe(),
        })
    }
}

struct BroadcastSubscription {
    receiver: broadcast::Receiver<DomainEvent>,
}

#[async_trait]
impl EventSubscription for BroadcastSubscription {
    async fn recv(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "subscriber lagged, dropping buffered events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::value_objects::{PatternId, Tier};

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = BroadcastEventBus::new();
        let mut sub = bus.subscribe().await;
        let event = DomainEvent::PatternAdded {
            id: PatternId::new(),
            tier: Tier::Local,
        };
        bus.publish(event.clone()).await.unwrap();
        assert_eq!(sub.recv().await, Some(event));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_does_not_fail() {
        let bus = BroadcastEventBus::new();
        let event = DomainEvent::Rollback {
            id: PatternId::new(),
            reason: "test rollback".to_owned(),
        };
        assert!(bus.publish(event).await.is_ok());
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive_the_event() {
        let bus = BroadcastEventBus::new();
        let mut first = bus.subscribe().await;
        let mut second = bus.subscribe().await;
        assert_eq!(bus.subscriber_count(), 2);

        let event = DomainEvent::Feedback {
            id: PatternId::new(),
            succeeded: true,
        };
        bus.publish(event.clone()).await.unwrap();

        assert_eq!(first.recv().await, Some(event.clone()));
        assert_eq!(second.recv().await, Some(event));
    }
}
