//! The `EventBus` capability: in-process pub/sub over [`DomainEvent`].
//! Delivery is best-effort and non-blocking for the publisher — a slow
//! or absent subscriber never stalls admission, healing, or federation.

use async_trait::async_trait;

use crate::error::Result;
use crate::events::DomainEvent;

/// A handle to a live subscription. Dropping it (or calling
/// [`EventSubscription::recv`] after the bus is closed) simply ends the
/// stream; it is not an error.
#[async_trait]
pub trait EventSubscription: Send {
    /// Wait for the next event, or `None` once the bus will never
    /// publish again.
    async fn recv(&mut self) -> Option<DomainEvent>;
}

/// Publish/subscribe broadcast of domain lifecycle events.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event to all current subscribers. Returns
    /// `Err(Error::Overloaded)` only if the bus's internal channel is
    /// full and the implementation chooses not to drop silently;
    /// `remembrance-events`'s default adapter instead drops the oldest
    /// buffered event and never errors here.
    async fn publish(&self, event: DomainEvent) -> Result<()>;

    /// Subscribe to all future events. Events published before this
    /// call are not replayed.
    async fn subscribe(&self) -> Box<dyn EventSubscription>;
}
