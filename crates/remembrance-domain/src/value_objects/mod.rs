//! Small, immutable value types shared across the workspace.

pub mod coherency;
pub mod ids;
pub mod language;
pub mod tier;

pub use coherency::CoherencyScore;
pub use ids::{DebugPatternId, PatternId, VariantId};
pub use language::Language;
pub use tier::Tier;
