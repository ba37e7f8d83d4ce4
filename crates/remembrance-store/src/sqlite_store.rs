//! `SqliteStore`: the SQLite-backed `PatternStorePort`.

use async_trait::async_trait;
use remembrance_domain::entities::{
    AuditLogEntry, DebugCategory, DebugPattern, HealedVariant, HealingStats, Pattern, PatternStatus,
};
use remembrance_domain::ports::store::{PatternFilter, PatternStorePort, PatternUpdate, StoreSummary};
use remembrance_domain::value_objects::{DebugPatternId, Language, PatternId};
use remembrance_domain::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, warn};

use crate::row;
use crate::schema;

/// Where to open a [`SqliteStore`]'s backing database.
#[derive(Debug, Clone)]
pub enum StoreLocation {
    /// Volatile, process-local database. Lost on drop; used by tests and
    /// by callers that deliberately want no persistence.
    InMemory,
    /// A database file, created if missing, at the given path.
    File(std::path::PathBuf),
}

impl StoreLocation {
    fn database_url(&self) -> String {
        match self {
            Self::InMemory => "sqlite::memory:".to_owned(),
            Self::File(path) => format!("sqlite:{}", path.display()),
        }
    }
}

/// The persistent, content-addressed pattern store. Every method maps
/// onto one or two SQL statements against a `SqlitePool`; there is no
/// in-process caching layer, so repeated reads always observe the
/// latest committed state.
pub struct SqliteStore {
    pool: SqlitePool,
    /// Directory a `backups/` subdirectory is written under before a bulk
    /// mutation. `None` for in-memory stores, which have nothing worth
    /// snapshotting.
    base_dir: Option<std::path::PathBuf>,
}

impl SqliteStore {
    /// Open (creating if necessary) a store at `location`, running
    /// migrations before returning.
    pub async fn open(location: StoreLocation) -> Result<Self> {
        let base_dir = if let StoreLocation::File(path) = &location {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::IoFailure { path: parent.display().to_string(), kind: e.kind().to_string() })?;
            }
            path.parent().map(ToOwned::to_owned)
        } else {
            None
        };

        let options: SqliteConnectOptions = location
            .database_url()
            .parse()
            .map_err(|e| Error::storage("invalid database url", e))?;
        let options = options.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::storage("failed to open store", e))?;

        schema::run_migrations(&pool).await?;

        Ok(Self { pool, base_dir })
    }

    /// Convenience constructor for a volatile, test-only store.
    pub async fn in_memory() -> Result<Self> {
        Self::open(StoreLocation::InMemory).await
    }

    /// Convenience constructor for a persistent, file-backed store.
    pub async fn file(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(StoreLocation::File(path.as_ref().to_path_buf())).await
    }

    async fn proven_name_collision(&self, name: &str, language: Language) -> Result<Option<uuid::Uuid>> {
        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM patterns WHERE name = ? AND language = ? AND status = 'proven'",
        )
        .bind(name)
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to check pattern name uniqueness", e))?;

        existing
            .map(|(id,)| uuid::Uuid::parse_str(&id).map_err(|e| Error::storage("corrupt identifier in store", e)))
            .transpose()
    }
}

#[async_trait]
impl PatternStorePort for SqliteStore {
    async fn insert(&self, pattern: Pattern) -> Result<Pattern> {
        if pattern.status == PatternStatus::Proven {
            if let Some(existing_id) = self.proven_name_collision(&pattern.name, pattern.language).await? {
                return Err(Error::DuplicateName { existing_id });
            }
        }

        let row = row::pattern_to_row(&pattern)?;
        sqlx::query(
            r#"
            INSERT INTO patterns (
                id, name, language, code, test_code, description, tags, pattern_type,
                complexity, coherency_score, test_passed, author, usage_count, success_count,
                last_used, created_at, parent_pattern_id, evolution_history, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.0)
        .bind(row.1)
        .bind(row.2)
        .bind(row.3)
        .bind(row.4)
        .bind(row.5)
        .bind(row.6)
        .bind(row.7)
        .bind(row.8)
        .bind(row.9)
        .bind(row.10)
        .bind(row.11)
        .bind(row.12)
        .bind(row.13)
        .bind(row.14)
        .bind(row.15)
        .bind(row.16)
        .bind(row.17)
        .bind(row.18)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to insert pattern", e))?;

        debug!(pattern_id = %pattern.id, name = %pattern.name, "inserted pattern");
        Ok(pattern)
    }

    async fn get(&self, id: PatternId) -> Result<Option<Pattern>> {
        let row: Option<row::PatternRow> = sqlx::query_as(
            r#"
            SELECT id, name, language, code, test_code, description, tags, pattern_type,
                   complexity, coherency_score, test_passed, author, usage_count, success_count,
                   last_used, created_at, parent_pattern_id, evolution_history, status
            FROM patterns WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to fetch pattern", e))?;

        row.map(row::row_to_pattern).transpose()
    }

    async fn list(&self, filter: PatternFilter) -> Result<Vec<Pattern>> {
        list_with_status_override(&self.pool, filter, None).await
    }

    async fn update(&self, id: PatternId, partial: PatternUpdate) -> Result<Pattern> {
        let mut pattern = self.get(id).await?.ok_or_else(|| Error::not_found("pattern", id.to_string()))?;

        if let Some(code) = partial.code {
            pattern.code = code;
        }
        if let Some(test_code) = partial.test_code {
            pattern.test_code = test_code;
        }
        if let Some(description) = partial.description {
            pattern.description = description;
        }
        if let Some(tags) = partial.tags {
            pattern.tags = tags;
        }
        if let Some(coherency_score) = partial.coherency_score {
            pattern.coherency_score = coherency_score;
        }
        if let Some(test_passed) = partial.test_passed {
            pattern.test_passed = test_passed;
        }
        if let Some(status) = partial.status {
            pattern.status = status;
        }

        let row = row::pattern_to_row(&pattern)?;
        sqlx::query(
            r#"
            UPDATE patterns SET
                code = ?, test_code = ?, description = ?, tags = ?, coherency_score = ?,
                test_passed = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(row.3)
        .bind(row.4)
        .bind(row.5)
        .bind(row.6)
        .bind(row.9)
        .bind(row.10)
        .bind(row.18)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to update pattern", e))?;

        Ok(pattern)
    }

    async fn record_usage(&self, id: PatternId, succeeded: bool) -> Result<Pattern> {
        let mut pattern = self.get(id).await?.ok_or_else(|| Error::not_found("pattern", id.to_string()))?;
        pattern.usage_count += 1;
        if succeeded {
            pattern.success_count += 1;
        }
        pattern.last_used = Some(chrono::Utc::now());

        sqlx::query("UPDATE patterns SET usage_count = ?, success_count = ?, last_used = ? WHERE id = ?")
            .bind(pattern.usage_count as i64)
            .bind(pattern.success_count as i64)
            .bind(pattern.last_used.map(|t| t.to_rfc3339()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to record usage", e))?;

        Ok(pattern)
    }

    async fn add_healed_variant(&self, variant: HealedVariant) -> Result<HealedVariant> {
        if !variant.is_non_regressing() {
            return Err(Error::storage_msg(format!(
                "refusing to store regressing variant: {} < {}",
                variant.healed_coherency, variant.original_coherency
            )));
        }

        let row = row::variant_to_row(&variant);
        sqlx::query(
            r#"
            INSERT INTO healed_variants (
                id, parent_pattern_id, healed_code, original_coherency, healed_coherency,
                healing_loops, healing_strategy, whisper, healed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.0)
        .bind(row.1)
        .bind(row.2)
        .bind(row.3)
        .bind(row.4)
        .bind(row.5)
        .bind(row.6)
        .bind(row.7)
        .bind(row.8)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to insert healed variant", e))?;

        Ok(variant)
    }

    async fn best_healed_variant(&self, parent_id: PatternId) -> Result<Option<HealedVariant>> {
        let row: Option<row::HealedVariantRow> = sqlx::query_as(
            r#"
            SELECT id, parent_pattern_id, healed_code, original_coherency, healed_coherency,
                   healing_loops, healing_strategy, whisper, healed_at
            FROM healed_variants
            WHERE parent_pattern_id = ?
            ORDER BY healed_coherency DESC, healing_loops ASC
            LIMIT 1
            "#,
        )
        .bind(parent_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to fetch best healed variant", e))?;

        row.map(row::row_to_variant).transpose()
    }

    async fn record_healing_attempt(
        &self,
        pattern_id: PatternId,
        succeeded: bool,
        before: f64,
        after: f64,
        _loops: u32,
    ) -> Result<HealingStats> {
        let mut stats = self.healing_stats(pattern_id).await.unwrap_or_default();
        stats.record_attempt(succeeded, before, after);

        sqlx::query(
            r#"
            INSERT INTO healing_stats (pattern_id, attempts, successes, peak_coherency, last_delta_best)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(pattern_id) DO UPDATE SET
                attempts = excluded.attempts,
                successes = excluded.successes,
                peak_coherency = excluded.peak_coherency,
                last_delta_best = excluded.last_delta_best
            "#,
        )
        .bind(pattern_id.to_string())
        .bind(stats.attempts as i64)
        .bind(stats.successes as i64)
        .bind(stats.peak_coherency)
        .bind(stats.last_delta_best)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to record healing attempt", e))?;

        Ok(stats)
    }

    async fn healing_stats(&self, pattern_id: PatternId) -> Result<HealingStats> {
        let row: Option<row::HealingStatsRow> = sqlx::query_as(
            "SELECT attempts, successes, peak_coherency, last_delta_best FROM healing_stats WHERE pattern_id = ?",
        )
        .bind(pattern_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to fetch healing stats", e))?;

        Ok(row.map(row::row_to_healing_stats).unwrap_or_else(|| HealingStats::fresh(pattern_id)))
    }

    async fn retire(&self, id: PatternId, reason: &str) -> Result<()> {
        sqlx::query("UPDATE patterns SET status = 'retired' WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to retire pattern", e))?;

        warn!(pattern_id = %id, reason, "retired pattern");
        self.audit(AuditLogEntry::new("retire", "patterns", id.to_string(), "store", reason)).await
    }

    async fn prune(&self, min_coherency: f64) -> Result<Vec<PatternId>> {
        let filter = PatternFilter {
            status: Some(PatternStatus::Proven),
            ..Default::default()
        };
        let candidates = list_with_status_override(&self.pool, filter, None).await?;

        if let Some(base_dir) = &self.base_dir {
            let all = list_with_status_override(&self.pool, PatternFilter::default(), None).await?;
            let log = self.audit_log(100_000).await.unwrap_or_default();
            crate::backup::write_snapshot(base_dir, "prune", &all, &[], &[], &log)?;
        }

        let mut retired = Vec::new();
        for pattern in candidates {
            if pattern.coherency_score.total < min_coherency {
                self.retire(pattern.id, "pruned: coherency below threshold").await?;
                retired.push(pattern.id);
            }
        }
        Ok(retired)
    }

    async fn candidates(&self, filter: PatternFilter) -> Result<Vec<Pattern>> {
        list_with_status_override(&self.pool, filter, Some(PatternStatus::Candidate)).await
    }

    async fn audit(&self, entry: AuditLogEntry) -> Result<()> {
        let row = row::audit_to_row(&entry);
        sqlx::query(
            r#"INSERT INTO audit_log (timestamp, action, "table", record_id, actor, detail) VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(row.0)
        .bind(row.1)
        .bind(row.2)
        .bind(row.3)
        .bind(row.4)
        .bind(row.5)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to append audit entry", e))?;
        Ok(())
    }

    async fn audit_log(&self, limit: usize) -> Result<Vec<AuditLogEntry>> {
        let rows: Vec<row::AuditLogRow> = sqlx::query_as(
            r#"SELECT timestamp, action, "table", record_id, actor, detail FROM audit_log ORDER BY rowid DESC LIMIT ?"#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to read audit log", e))?;

        rows.into_iter().map(row::row_to_audit).collect()
    }

    async fn upsert_debug_pattern(&self, pattern: DebugPattern) -> Result<DebugPattern> {
        let row = row::debug_pattern_to_row(&pattern);
        sqlx::query(
            r#"
            INSERT INTO debug_patterns (
                id, fingerprint, error_message, stack_trace, fix_code, language, category,
                confidence, times_applied, times_resolved
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(fingerprint) DO UPDATE SET
                error_message = excluded.error_message,
                stack_trace = excluded.stack_trace,
                fix_code = excluded.fix_code,
                confidence = excluded.confidence,
                times_applied = excluded.times_applied,
                times_resolved = excluded.times_resolved
            "#,
        )
        .bind(row.0)
        .bind(&row.1)
        .bind(row.2)
        .bind(row.3)
        .bind(row.4)
        .bind(row.5)
        .bind(row.6)
        .bind(row.7)
        .bind(row.8)
        .bind(row.9)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to upsert debug pattern", e))?;

        // The conflict path keeps the pre-existing row's id; reread so
        // callers always see the identity actually on file.
        let stored: row::DebugPatternRow = sqlx::query_as(
            r#"
            SELECT id, fingerprint, error_message, stack_trace, fix_code, language, category,
                   confidence, times_applied, times_resolved
            FROM debug_patterns WHERE fingerprint = ?
            "#,
        )
        .bind(&row.1)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to reread upserted debug pattern", e))?;

        row::row_to_debug_pattern(stored)
    }

    async fn find_debug_patterns(
        &self,
        language: Option<Language>,
        category: Option<DebugCategory>,
        fingerprint_prefix: &str,
    ) -> Result<Vec<DebugPattern>> {
        let language = language.map(|l| l.as_str().to_owned());
        let category = category.map(row::category_to_str).map(ToOwned::to_owned);
        let like_pattern = format!("{fingerprint_prefix}%");

        let rows: Vec<row::DebugPatternRow> = sqlx::query_as(
            r#"
            SELECT id, fingerprint, error_message, stack_trace, fix_code, language, category,
                   confidence, times_applied, times_resolved
            FROM debug_patterns
            WHERE (?1 IS NULL OR language = ?1)
              AND (?2 IS NULL OR category = ?2)
              AND fingerprint LIKE ?3
            ORDER BY confidence DESC
            "#,
        )
        .bind(language)
        .bind(category)
        .bind(like_pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to search debug patterns", e))?;

        rows.into_iter().map(row::row_to_debug_pattern).collect()
    }

    async fn record_debug_feedback(&self, id: DebugPatternId, resolved: bool) -> Result<DebugPattern> {
        let row: Option<row::DebugPatternRow> = sqlx::query_as(
            r#"
            SELECT id, fingerprint, error_message, stack_trace, fix_code, language, category,
                   confidence, times_applied, times_resolved
            FROM debug_patterns WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::storage("failed to fetch debug pattern", e))?;

        let mut pattern = row
            .map(row::row_to_debug_pattern)
            .transpose()?
            .ok_or_else(|| Error::not_found("debug pattern", id.to_string()))?;

        pattern.times_applied += 1;
        if resolved {
            pattern.times_resolved += 1;
        }
        pattern.confidence = remembrance_coherency::confidence(pattern.times_applied as u32, pattern.times_resolved as u32);

        sqlx::query("UPDATE debug_patterns SET times_applied = ?, times_resolved = ?, confidence = ? WHERE id = ?")
            .bind(pattern.times_applied as i64)
            .bind(pattern.times_resolved as i64)
            .bind(pattern.confidence)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to record debug feedback", e))?;

        Ok(pattern)
    }

    async fn summary(&self) -> Result<StoreSummary> {
        let (total_patterns,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patterns")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count patterns", e))?;
        let (proven_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patterns WHERE status = 'proven'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count proven patterns", e))?;
        let (candidate_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patterns WHERE status = 'candidate'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count candidate patterns", e))?;
        let (retired_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patterns WHERE status = 'retired'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count retired patterns", e))?;
        let (healed_variant_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM healed_variants")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count healed variants", e))?;
        let (debug_pattern_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM debug_patterns")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::storage("failed to count debug patterns", e))?;

        Ok(StoreSummary {
            total_patterns: total_patterns as u64,
            proven_count: proven_count as u64,
            candidate_count: candidate_count as u64,
            retired_count: retired_count as u64,
            healed_variant_count: healed_variant_count as u64,
            debug_pattern_count: debug_pattern_count as u64,
        })
    }
}

/// Shared implementation of `list`/`candidates`: identical filter logic,
/// differing only in whether `status` is forced to `candidate`.
async fn list_with_status_override(
    pool: &SqlitePool,
    filter: PatternFilter,
    force_status: Option<PatternStatus>,
) -> Result<Vec<Pattern>> {
    let status = force_status.or(filter.status).map(row::status_to_str).map(ToOwned::to_owned);
    let language = filter.language.map(|l| l.as_str().to_owned());
    let min_coherency = filter.min_coherency.unwrap_or(0.0);

    let rows: Vec<row::PatternRow> = sqlx::query_as(
        r#"
        SELECT id, name, language, code, test_code, description, tags, pattern_type,
               complexity, coherency_score, test_passed, author, usage_count, success_count,
               last_used, created_at, parent_pattern_id, evolution_history, status
        FROM patterns
        WHERE (?1 IS NULL OR status = ?1)
          AND (?2 IS NULL OR language = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(status)
    .bind(language)
    .fetch_all(pool)
    .await
    .map_err(|e| Error::storage("failed to list patterns", e))?;

    let mut patterns = rows.into_iter().map(row::row_to_pattern).collect::<Result<Vec<_>>>()?;

    patterns.retain(|p| p.coherency_score.total >= min_coherency);
    if !filter.tags.is_empty() {
        patterns.retain(|p| filter.tags.iter().all(|tag| p.tags.contains(tag)));
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remembrance_domain::value_objects::CoherencyScore;

    fn sample_pattern(name: &str, status: PatternStatus) -> Pattern {
        Pattern {
            id: PatternId::new(),
            name: name.to_owned(),
            language: Language::Rust,
            code: "fn f() {}".to_owned(),
            test_code: String::new(),
            description: "a sample".to_owned(),
            tags: vec!["demo".to_owned()],
            pattern_type: "function".to_owned(),
            complexity: "trivial".to_owned(),
            coherency_score: CoherencyScore::new(0.8, 0.8, 0.8, 0.8, 0.8),
            test_passed: true,
            author: "tester".to_owned(),
            usage_count: 0,
            success_count: 0,
            last_used: None,
            created_at: chrono::Utc::now(),
            parent_pattern_id: None,
            evolution_history: Vec::new(),
            status,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = sample_pattern("add", PatternStatus::Candidate);
        let id = pattern.id;
        store.insert(pattern).await.unwrap();

        let fetched = store.get(id).await.unwrap().expect("pattern present");
        assert_eq!(fetched.name, "add");
        assert_eq!(fetched.tags, vec!["demo".to_owned()]);
    }

    #[tokio::test]
    async fn duplicate_proven_name_is_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample_pattern("add", PatternStatus::Proven)).await.unwrap();

        let result = store.insert(sample_pattern("add", PatternStatus::Proven)).await;
        assert!(matches!(result, Err(Error::DuplicateName { .. })));
    }

    #[tokio::test]
    async fn regressing_variant_is_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = sample_pattern("add", PatternStatus::Proven);
        let id = pattern.id;
        store.insert(pattern).await.unwrap();

        let variant = HealedVariant {
            id: remembrance_domain::value_objects::VariantId::new(),
            parent_pattern_id: id,
            healed_code: "fn f() {}".to_owned(),
            original_coherency: 0.8,
            healed_coherency: 0.7,
            healing_loops: 1,
            healing_strategy: "simplify".to_owned(),
            whisper: "tidied".to_owned(),
            healed_at: chrono::Utc::now(),
        };

        assert!(store.add_healed_variant(variant).await.is_err());
    }

    #[tokio::test]
    async fn record_usage_advances_counters() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = sample_pattern("add", PatternStatus::Candidate);
        let id = pattern.id;
        store.insert(pattern).await.unwrap();

        store.record_usage(id, true).await.unwrap();
        let updated = store.record_usage(id, false).await.unwrap();

        assert_eq!(updated.usage_count, 2);
        assert_eq!(updated.success_count, 1);
    }

    #[tokio::test]
    async fn retire_marks_status_and_audits() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = sample_pattern("add", PatternStatus::Proven);
        let id = pattern.id;
        store.insert(pattern).await.unwrap();

        store.retire(id, "superseded").await.unwrap();
        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, PatternStatus::Retired);

        let log = store.audit_log(10).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].action, "retire");
    }

    #[tokio::test]
    async fn prune_retires_only_low_coherency_proven_patterns() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut low = sample_pattern("weak", PatternStatus::Proven);
        low.coherency_score = CoherencyScore::new(0.1, 0.1, 0.1, 0.1, 0.1);
        let low_id = low.id;
        store.insert(low).await.unwrap();
        store.insert(sample_pattern("strong", PatternStatus::Proven)).await.unwrap();

        let retired = store.prune(0.5).await.unwrap();
        assert_eq!(retired, vec![low_id]);
    }

    #[tokio::test]
    async fn debug_pattern_upsert_is_keyed_by_fingerprint() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = DebugPattern {
            id: DebugPatternId::new(),
            fingerprint: "fp-1".to_owned(),
            error_message: "boom".to_owned(),
            stack_trace: None,
            fix_code: "fn fix() {}".to_owned(),
            language: Language::Rust,
            category: DebugCategory::Runtime,
            confidence: 0.2,
            times_applied: 0,
            times_resolved: 0,
        };

        let first = store.upsert_debug_pattern(pattern.clone()).await.unwrap();
        let mut updated = pattern;
        updated.error_message = "boom again".to_owned();
        let second = store.upsert_debug_pattern(updated).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.error_message, "boom again");
    }

    #[tokio::test]
    async fn debug_feedback_raises_confidence_on_resolution() {
        let store = SqliteStore::in_memory().await.unwrap();
        let pattern = DebugPattern {
            id: DebugPatternId::new(),
            fingerprint: "fp-2".to_owned(),
            error_message: "boom".to_owned(),
            stack_trace: None,
            fix_code: "fn fix() {}".to_owned(),
            language: Language::Rust,
            category: DebugCategory::Runtime,
            confidence: 0.2,
            times_applied: 0,
            times_resolved: 0,
        };
        let stored = store.upsert_debug_pattern(pattern).await.unwrap();

        let updated = store.record_debug_feedback(stored.id, true).await.unwrap();
        assert!(updated.confidence > stored.confidence);
    }

    #[tokio::test]
    async fn summary_counts_every_status() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample_pattern("a", PatternStatus::Proven)).await.unwrap();
        store.insert(sample_pattern("b", PatternStatus::Candidate)).await.unwrap();

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.total_patterns, 2);
        assert_eq!(summary.proven_count, 1);
        assert_eq!(summary.candidate_count, 1);
    }
}
