//! Rolling per-pattern healing counters and the derived composite boost.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SUCCESS_RATE, HEALING_BOOST_CAP};
use crate::value_objects::PatternId;

/// Rolling counters maintained by `PatternStore::recordHealingAttempt`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HealingStats {
    /// Pattern these counters describe.
    pub pattern_id_attempts: u64,
    /// Total healing attempts recorded.
    pub attempts: u64,
    /// Attempts that produced an improvement.
    pub successes: u64,
    /// Highest coherency total ever reached by a healed variant of this
    /// pattern.
    pub peak_coherency: f64,
    /// Coherency delta of the most recent successful attempt
    /// (`after - before`).
    pub last_delta_best: f64,
}

impl HealingStats {
    /// Counters for a pattern with no recorded healing history.
    #[must_use]
    pub fn fresh(_pattern_id: PatternId) -> Self {
        Self::default()
    }

    /// `successes / attempts`, with an optimistic default of `1.0` when no
    /// attempts have been recorded.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            DEFAULT_SUCCESS_RATE
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }

    /// `clamp(successRate * (1 + bestDelta), 0, 1.5)`.
    #[must_use]
    pub fn composite_boost(&self) -> f64 {
        let raw = self.success_rate() * (1.0 + self.last_delta_best);
        raw.clamp(0.0, HEALING_BOOST_CAP)
    }

    /// Fold in one more healing attempt.
    pub fn record_attempt(&mut self, succeeded: bool, before: f64, after: f64) {
        self.attempts += 1;
        if succeeded {
            self.successes += 1;
            let delta = after - before;
            self.last_delta_best = delta.max(self.last_delta_best);
            self.peak_coherency = self.peak_coherency.max(after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_attempts_is_optimistic() {
        let s = HealingStats::fresh(PatternId::new());
        assert_eq!(s.success_rate(), 1.0);
        assert_eq!(s.composite_boost(), 1.0);
    }

    #[test]
    fn boost_is_clamped() {
        let mut s = HealingStats::fresh(PatternId::new());
        for _ in 0..5 {
            s.record_attempt(true, 0.1, 0.9);
        }
        assert!(s.composite_boost() <= 1.5);
    }

    #[test]
    fn failed_attempt_lowers_rate_but_not_boost_floor() {
        let mut s = HealingStats::fresh(PatternId::new());
        s.record_attempt(true, 0.5, 0.6);
        s.record_attempt(false, 0.6, 0.6);
        assert_eq!(s.attempts, 2);
        assert_eq!(s.successes, 1);
        assert!(s.composite_boost() >= 0.0);
    }
}
