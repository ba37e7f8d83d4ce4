//! [`remembrance_domain::ports::assistant::ExternalAssistant`] adapters.
//! The only one shipped today is [`NoopAssistant`]; a real bridge to an
//! external model is a configuration-time choice left to
//! `remembrance-core`.

pub mod noop;

pub use noop::NoopAssistant;
