//! An immutable improvement derived from a parent pattern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PatternId, VariantId};

/// A non-regressing, immutable improvement over a parent pattern's code.
/// Never mutated after creation; a rejected healing attempt is recorded
/// only in [`crate::entities::healing_stats::HealingStats`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealedVariant {
    /// Opaque identity.
    pub id: VariantId,
    /// The pattern this variant improves on.
    pub parent_pattern_id: PatternId,
    /// The improved source.
    pub healed_code: String,
    /// Coherency total of the parent's code before healing.
    pub original_coherency: f64,
    /// Coherency total of `healed_code`.
    pub healed_coherency: f64,
    /// Number of reflection-loop iterations consumed.
    pub healing_loops: u32,
    /// Name of the transform that produced the best candidate
    /// (`"simplify"`, `"secure"`, `"readable"`, `"unify"`, `"correct"`).
    pub healing_strategy: String,
    /// Short human-readable note describing the change.
    pub whisper: String,
    /// Creation timestamp.
    pub healed_at: DateTime<Utc>,
}

impl HealedVariant {
    /// `true` when the non-regression invariant holds.
    #[must_use]
    pub fn is_non_regressing(&self) -> bool {
        self.healed_coherency >= self.original_coherency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regressing_variant_fails_invariant() {
        let v = HealedVariant {
            id: VariantId::new(),
            parent_pattern_id: PatternId::new(),
            healed_code: String::new(),
            original_coherency: 0.7,
            healed_coherency: 0.6,
            healing_loops: 1,
            healing_strategy: "simplify".to_owned(),
            whisper: "tidied".to_owned(),
            healed_at: Utc::now(),
        };
        assert!(!v.is_non_regressing());
    }
}
