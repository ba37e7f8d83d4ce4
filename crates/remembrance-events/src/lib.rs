//! Concrete [`remembrance_domain::ports::events::EventBus`] adapters: a
//! Tokio broadcast channel for production, and a null bus for tests.

pub mod broadcast;
pub mod null;

pub use broadcast::BroadcastEventBus;
pub use null::NullEventBus;
