//! The `PatternStore` capability: a persistent, content-addressed,
//! versioned record store with candidate/proven/retired lifecycle.

use async_trait::async_trait;

use crate::entities::{AuditLogEntry, DebugCategory, DebugPattern, HealedVariant, HealingStats, Pattern, PatternStatus};
use crate::error::Result;
use crate::value_objects::{DebugPatternId, Language, PatternId};

/// Filter accepted by `list`/`candidates`.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    /// Restrict to one language.
    pub language: Option<Language>,
    /// Restrict to patterns carrying every listed tag.
    pub tags: Vec<String>,
    /// Minimum `coherencyScore.total`.
    pub min_coherency: Option<f64>,
    /// Restrict to one lifecycle status.
    pub status: Option<PatternStatus>,
}

/// A partial update accepted by `update`. `None` fields are left
/// unchanged. `id`, `createdAt`, and `parentPatternId` are immutable and
/// therefore have no setter here.
#[derive(Debug, Clone, Default)]
pub struct PatternUpdate {
    /// Replace the stored code.
    pub code: Option<String>,
    /// Replace the declared test code.
    pub test_code: Option<String>,
    /// Replace the description.
    pub description: Option<String>,
    /// Replace the tag set.
    pub tags: Option<Vec<String>>,
    /// Replace the coherency score (used after a healing swap).
    pub coherency_score: Option<crate::value_objects::CoherencyScore>,
    /// Replace the test-passed flag.
    pub test_passed: Option<bool>,
    /// Replace the lifecycle status.
    pub status: Option<PatternStatus>,
}

/// Persistent record store. All mutations are individually atomic; batch
/// operations are not transactional across multiple entities — callers
/// performing a multi-step change must treat partial failure as possible
/// and use the audit log to reconcile.
#[async_trait]
pub trait PatternStorePort: Send + Sync {
    /// Insert a new pattern. Fails with `DuplicateName` if an existing
    /// pattern has the same `(name, language)` among proven patterns and
    /// the new one is not an explicit evolution.
    async fn insert(&self, pattern: Pattern) -> Result<Pattern>;

    /// Fetch a pattern by id.
    async fn get(&self, id: PatternId) -> Result<Option<Pattern>>;

    /// List patterns matching `filter`.
    async fn list(&self, filter: PatternFilter) -> Result<Vec<Pattern>>;

    /// Apply a partial update. Disallows mutation of `id`, `createdAt`,
    /// `parentPatternId`.
    async fn update(&self, id: PatternId, partial: PatternUpdate) -> Result<Pattern>;

    /// Atomically advance `usageCount` and, if `succeeded`, `successCount`.
    async fn record_usage(&self, id: PatternId, succeeded: bool) -> Result<Pattern>;

    /// Store a new healed variant. Rejects a variant whose
    /// `healedCoherency < originalCoherency`.
    async fn add_healed_variant(&self, variant: HealedVariant) -> Result<HealedVariant>;

    /// Highest-`healedCoherency` variant for a parent, tie-broken by
    /// lowest `healingLoops`.
    async fn best_healed_variant(&self, parent_id: PatternId) -> Result<Option<HealedVariant>>;

    /// Fold one more healing attempt into the pattern's rolling stats.
    /// Always succeeds.
    async fn record_healing_attempt(
        &self,
        pattern_id: PatternId,
        succeeded: bool,
        before: f64,
        after: f64,
        loops: u32,
    ) -> Result<HealingStats>;

    /// Read the current healing stats for a pattern.
    async fn healing_stats(&self, pattern_id: PatternId) -> Result<HealingStats>;

    /// Mark a pattern retired. The record remains for audit.
    async fn retire(&self, id: PatternId, reason: &str) -> Result<()>;

    /// Retire every proven pattern whose score falls below `min_coherency`.
    /// Returns the affected ids.
    async fn prune(&self, min_coherency: f64) -> Result<Vec<PatternId>>;

    /// List candidates matching `filter` (status is forced to
    /// `Candidate`).
    async fn candidates(&self, filter: PatternFilter) -> Result<Vec<Pattern>>;

    /// Append an audit entry. Exposed so callers outside the store
    /// (e.g. `HealingSupervisor`'s rollback path) can record actions
    /// the store itself did not perform directly.
    async fn audit(&self, entry: AuditLogEntry) -> Result<()>;

    /// Read the most recent audit entries, newest first.
    async fn audit_log(&self, limit: usize) -> Result<Vec<AuditLogEntry>>;

    /// Upsert a debug pattern keyed by its fingerprint.
    async fn upsert_debug_pattern(&self, pattern: DebugPattern) -> Result<DebugPattern>;

    /// Find debug patterns matching a fingerprint-derived query.
    async fn find_debug_patterns(
        &self,
        language: Option<Language>,
        category: Option<DebugCategory>,
        fingerprint_prefix: &str,
    ) -> Result<Vec<DebugPattern>>;

    /// Record that a debug pattern's fix was applied and, optionally,
    /// resolved the error.
    async fn record_debug_feedback(&self, id: DebugPatternId, resolved: bool) -> Result<DebugPattern>;

    /// Aggregate counters for `stats()`.
    async fn summary(&self) -> Result<StoreSummary>;
}

/// Aggregate store counters returned by the public `stats()` operation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct StoreSummary {
    /// Total patterns regardless of status.
    pub total_patterns: u64,
    /// Patterns with `status = proven`.
    pub proven_count: u64,
    /// Patterns with `status = candidate`.
    pub candidate_count: u64,
    /// Patterns with `status = retired`.
    pub retired_count: u64,
    /// Total healed variants ever recorded.
    pub healed_variant_count: u64,
    /// Total debug patterns recorded.
    pub debug_pattern_count: u64,
}
