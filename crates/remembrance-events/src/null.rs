//! A no-op `EventBus` for tests that don't care about event delivery.

use async_trait::async_trait;
use remembrance_domain::events::DomainEvent;
use remembrance_domain::ports::events::{EventBus, EventSubscription};
use remembrance_domain::Result;

/// Accepts every publish and hands out subscriptions that never yield an
/// event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventBus;

#[async_trait]
impl EventBus for NullEventBus {
    async fn publish(&self, _event: DomainEvent) -> Result<()> {
        Ok(())
    }

    async fn subscribe(&self) -> Box<dyn EventSubscription> {
        Box::new(NullSubscription)
    }
}

struct NullSubscription;

#[async_trait]
impl EventSubscription for NullSubscription {
    async fn recv(&mut self) -> Option<DomainEvent> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::value_objects::PatternId;

    #[tokio::test]
    async fn publish_always_succeeds() {
        let bus = NullEventBus;
        let event = DomainEvent::HealingStart { id: PatternId::new() };
        assert!(bus.publish(event).await.is_ok());
    }

    #[tokio::test]
    async fn subscription_never_yields_an_event() {
        let bus = NullEventBus;
        let mut sub = bus.subscribe().await;
        assert_eq!(sub.recv().await, None);
    }
}
