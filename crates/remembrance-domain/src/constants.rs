//! Default values for the knobs enumerated in the system configuration
//! table. Components read these through `remembrance-core`'s config layer;
//! they live here so tests and other crates can reference the same
//! canonical defaults without pulling in the config crate.

/// Minimum composite coherency required to store a submission at all.
pub const DEFAULT_ADMISSION_THRESHOLD: f64 = 0.6;

/// Score at/above which [`crate::entities::healing_stats`] skips a pattern
/// during a healing pass.
pub const DEFAULT_HEAL_TARGET: f64 = 0.85;

/// Score at/above which a healed variant is swapped in to replace its
/// parent's code.
pub const DEFAULT_PROMOTE_THRESHOLD: f64 = 0.9;

/// Patterns considered per `HealingSupervisor::run_once` invocation.
pub const DEFAULT_MAX_HEALS_PER_RUN: usize = 20;

/// Reflection loop iterations for a PULL match.
pub const DEFAULT_MAX_HEAL_LOOPS_PULL: u32 = 3;

/// Reflection loop iterations for an EVOLVE match.
pub const DEFAULT_MAX_HEAL_LOOPS_EVOLVE: u32 = 5;

/// Sandbox wall-clock timeout in milliseconds.
pub const DEFAULT_SANDBOX_TIMEOUT_MS: u64 = 10_000;

/// Sandbox captured-output cap in bytes; output beyond this is truncated.
pub const DEFAULT_SANDBOX_OUTPUT_CAP_BYTES: usize = 64 * 1024;

/// Per-remote-tier federation timeout in milliseconds.
pub const DEFAULT_FEDERATION_TIMEOUT_MS: u64 = 5_000;

/// Per-tier timeout for the personal/community stores.
pub const DEFAULT_LOCAL_STORE_TIMEOUT_MS: u64 = 2_000;

/// Minimum improvement a reflection transform must produce to be kept.
pub const REFLECTION_EPSILON: f64 = 0.005;

/// Resolver decision boundary: `composite >= PULL` returns the pattern
/// as-is.
pub const RESOLVE_PULL_THRESHOLD: f64 = 0.80;

/// Resolver decision boundary: `composite >= EVOLVE` returns the pattern
/// with a longer healing loop.
pub const RESOLVE_EVOLVE_THRESHOLD: f64 = 0.55;

/// Minimum coherency required for a personal-to-community share.
pub const DEFAULT_SHARE_MIN_COHERENCY: f64 = 0.7;

/// Minimum coherency accepted by a plain query (independent of
/// `admissionThreshold`; see spec Open Questions).
pub const DEFAULT_QUERY_MIN_COHERENCY: f64 = 0.5;

/// Weight applied to `relevance` in the composite ranking score.
pub const WEIGHT_RELEVANCE: f64 = 0.45;

/// Weight applied to `coherencyScore.total` in the composite ranking score.
pub const WEIGHT_COHERENCY: f64 = 0.30;

/// Weight applied to `reliability` in the composite ranking score.
pub const WEIGHT_RELIABILITY: f64 = 0.15;

/// Weight applied to the normalized healing composite boost.
pub const WEIGHT_HEALING_BOOST: f64 = 0.10;

/// Upper bound of the healing composite boost before normalization.
pub const HEALING_BOOST_CAP: f64 = 1.5;

/// Optimistic default for `successRate` when a pattern has no healing
/// attempts yet.
pub const DEFAULT_SUCCESS_RATE: f64 = 1.0;

/// Optimistic default for `reliability` when a pattern has never been used.
pub const DEFAULT_RELIABILITY: f64 = 0.5;
