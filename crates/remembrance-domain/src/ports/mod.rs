//! Capability interfaces implemented by a single concrete adapter each.
//! Kept here — rather than in the consuming crate — only for the
//! handful of ports that more than one crate needs to agree on:
//! `remembrance-store`, `remembrance-events`, `remembrance-assistant`, and
//! `remembrance-core` all compile against these trait objects instead of
//! each other's concrete types.

pub mod assistant;
pub mod events;
pub mod store;

pub use assistant::ExternalAssistant;
pub use events::EventBus;
pub use store::PatternStorePort;
