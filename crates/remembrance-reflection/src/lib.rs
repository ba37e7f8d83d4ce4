//! Idempotent code transforms and the bounded fixed-point loop that
//! applies the best of them on each pass.

pub mod engine;
pub mod transforms;

pub use engine::{HealResult, HealStep, ReflectionEngine};
