//! The five-dimensional coherency score produced by `CoherencyScorer`.

use serde::{Deserialize, Serialize};

/// Weight applied to each dimension; see `CoherencyScore::total`.
pub const WEIGHT_SIMPLICITY: f64 = 0.20;
/// Weight applied to `readability`.
pub const WEIGHT_READABILITY: f64 = 0.20;
/// Weight applied to `security`.
pub const WEIGHT_SECURITY: f64 = 0.20;
/// Weight applied to `unity`.
pub const WEIGHT_UNITY: f64 = 0.15;
/// Weight applied to `correctness`.
pub const WEIGHT_CORRECTNESS: f64 = 0.25;

/// Five bounded dimensions plus their weighted sum. Every field is in
/// `[0, 1]`; `total` is always the weighted sum of the five and therefore
/// also in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherencyScore {
    /// Penalizes long lines, deep nesting, very long functions.
    pub simplicity: f64,
    /// Consistent indentation/spacing, proportional commenting, stable
    /// identifier casing.
    pub readability: f64,
    /// Absence of flagged constructs.
    pub security: f64,
    /// Internal consistency: one quote style, one terminator policy, one
    /// dominant naming convention.
    pub unity: f64,
    /// Syntax sanity and structural balance.
    pub correctness: f64,
    /// Weighted sum of the five dimensions above.
    pub total: f64,
}

impl CoherencyScore {
    /// Compute `total` from the five dimensions and return the finished
    /// score. This is the only constructor: `total` can never drift from
    /// its components.
    #[must_use]
    pub fn new(simplicity: f64, readability: f64, security: f64, unity: f64, correctness: f64) -> Self {
        let total = simplicity * WEIGHT_SIMPLICITY
            + readability * WEIGHT_READABILITY
            + security * WEIGHT_SECURITY
            + unity * WEIGHT_UNITY
            + correctness * WEIGHT_CORRECTNESS;
        Self {
            simplicity,
            readability,
            security,
            unity,
            correctness,
            total,
        }
    }

    /// The zero score, used as a safe fallback when scoring cannot run at
    /// all (never returned by a successful `CoherencyScorer::score` call).
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let sum = WEIGHT_SIMPLICITY + WEIGHT_READABILITY + WEIGHT_SECURITY + WEIGHT_UNITY + WEIGHT_CORRECTNESS;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perfect_score_totals_one() {
        let score = CoherencyScore::new(1.0, 1.0, 1.0, 1.0, 1.0);
        assert!((score.total - 1.0).abs() < 1e-9);
    }
}
