//! Deterministic operator-facing notes selected by the Resolver (spec
//! §4.G). Selection is a pure function of the decision and the matched
//! pattern's size, never random, so the same query always produces the
//! same whisper.

use crate::resolver::Decision;

const PULL_WHISPERS: &[&str] = &[
    "this one has held up before",
    "a known-good fit, returning as-is",
    "already proven for this shape",
];

const EVOLVE_WHISPERS: &[&str] = &[
    "close, giving it one more pass before handing it back",
    "promising but rough, healing before return",
    "a fit worth polishing first",
];

const GENERATE_WHISPERS: &[&str] = &[
    "nothing close enough on file, starting fresh",
    "no prior art for this one",
    "new ground, no pattern to lean on",
];

/// Pick a whisper deterministically from `(decision, key)`.
#[must_use]
pub fn select(decision: Decision, key: usize) -> &'static str {
    let pool = match decision {
        Decision::Pull => PULL_WHISPERS,
        Decision::Evolve => EVOLVE_WHISPERS,
        Decision::Generate => GENERATE_WHISPERS,
    };
    pool[key % pool.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_always_selects_the_same_whisper() {
        assert_eq!(select(Decision::Pull, 7), select(Decision::Pull, 7));
    }

    #[test]
    fn different_decisions_draw_from_different_pools() {
        assert_ne!(select(Decision::Pull, 0), select(Decision::Generate, 0));
    }
}
