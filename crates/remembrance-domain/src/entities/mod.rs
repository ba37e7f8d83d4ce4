//! Persisted record shapes owned exclusively by `PatternStore`.

pub mod audit;
pub mod debug_pattern;
pub mod healed_variant;
pub mod healing_stats;
pub mod pattern;

pub use audit::AuditLogEntry;
pub use debug_pattern::{DebugCategory, DebugPattern};
pub use healed_variant::HealedVariant;
pub use healing_stats::HealingStats;
pub use pattern::{Pattern, PatternStatus, PatternType};
