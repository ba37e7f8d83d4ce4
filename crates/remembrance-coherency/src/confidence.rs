//! Confidence scoring for recurring debug patterns.
//!
//! `confidence` is a sigmoid over the applied/resolved counters so that a
//! brand new pattern starts cautiously optimistic (`0.2`), climbs toward
//! `1.0` as it keeps resolving what it's applied to, and sinks toward `0.0`
//! if it keeps getting applied without resolving anything.

/// `sigmoid(BIAS) == 0.2`, chosen so a pattern with no history at all
/// starts at the same optimistic default used elsewhere in the domain.
const BIAS: f64 = -1.386_294_361_119_890_6; // ln(0.2 / 0.8)

/// Weight on the resolved count: each additional resolution pushes
/// confidence up.
const RESOLVED_WEIGHT: f64 = 0.9;

/// Weight on the unresolved count (applied minus resolved): each
/// additional unresolved application pulls confidence down.
const UNRESOLVED_WEIGHT: f64 = 0.6;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Confidence that a debug pattern's suggested fix will resolve the next
/// occurrence of its error fingerprint, given how often it has been
/// applied and how often application actually resolved the issue.
///
/// `confidence(0, 0) == 0.2` exactly. Confidence rises toward `1.0` as
/// `times_resolved` grows without bound, and falls toward `0.0` as the
/// unresolved count (`times_applied - times_resolved`) grows without
/// bound.
#[must_use]
pub fn confidence(times_applied: u32, times_resolved: u32) -> f64 {
    let resolved = times_resolved as f64;
    let unresolved = times_applied.saturating_sub(times_resolved) as f64;
    sigmoid(BIAS + RESOLVED_WEIGHT * resolved - UNRESOLVED_WEIGHT * unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pattern_starts_at_point_two() {
        assert!((confidence(0, 0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn repeated_resolution_climbs_toward_one() {
        let low = confidence(1, 1);
        let high = confidence(20, 20);
        assert!(high > low);
        assert!(high > 0.95);
    }

    #[test]
    fn repeated_failure_sinks_toward_zero() {
        let low = confidence(20, 0);
        assert!(low < 0.05);
    }

    #[test]
    fn confidence_is_always_bounded() {
        for applied in [0, 1, 5, 50, 1000] {
            for resolved in 0..=applied.min(50) {
                let c = confidence(applied, resolved);
                assert!((0.0..=1.0).contains(&c), "confidence({applied},{resolved}) = {c}");
            }
        }
    }
}
