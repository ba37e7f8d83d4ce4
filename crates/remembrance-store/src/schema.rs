//! Table creation. Every statement is `CREATE TABLE IF NOT EXISTS` so
//! opening an existing database is a no-op migration.

use remembrance_domain::{Error, Result};
use sqlx::SqlitePool;

pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patterns (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            language TEXT NOT NULL,
            code TEXT NOT NULL,
            test_code TEXT NOT NULL,
            description TEXT NOT NULL,
            tags TEXT NOT NULL,
            pattern_type TEXT NOT NULL,
            complexity TEXT NOT NULL,
            coherency_score TEXT NOT NULL,
            test_passed INTEGER NOT NULL,
            author TEXT NOT NULL,
            usage_count INTEGER NOT NULL,
            success_count INTEGER NOT NULL,
            last_used TEXT,
            created_at TEXT NOT NULL,
            parent_pattern_id TEXT,
            evolution_history TEXT NOT NULL,
            status TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create patterns table", e))?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_patterns_proven_name \
         ON patterns(name, language) WHERE status = 'proven'",
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create patterns proven-name index", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_patterns_status ON patterns(status)")
        .execute(pool)
        .await
        .map_err(|e| Error::storage("failed to create patterns status index", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS healed_variants (
            id TEXT PRIMARY KEY,
            parent_pattern_id TEXT NOT NULL,
            healed_code TEXT NOT NULL,
            original_coherency REAL NOT NULL,
            healed_coherency REAL NOT NULL,
            healing_loops INTEGER NOT NULL,
            healing_strategy TEXT NOT NULL,
            whisper TEXT NOT NULL,
            healed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create healed_variants table", e))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_healed_variants_parent \
         ON healed_variants(parent_pattern_id)",
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create healed_variants parent index", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS healing_stats (
            pattern_id TEXT PRIMARY KEY,
            attempts INTEGER NOT NULL,
            successes INTEGER NOT NULL,
            peak_coherency REAL NOT NULL,
            last_delta_best REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create healing_stats table", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS debug_patterns (
            id TEXT PRIMARY KEY,
            fingerprint TEXT NOT NULL UNIQUE,
            error_message TEXT NOT NULL,
            stack_trace TEXT,
            fix_code TEXT NOT NULL,
            language TEXT NOT NULL,
            category TEXT NOT NULL,
            confidence REAL NOT NULL,
            times_applied INTEGER NOT NULL,
            times_resolved INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create debug_patterns table", e))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_debug_patterns_lookup \
         ON debug_patterns(language, category, fingerprint)",
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create debug_patterns lookup index", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            rowid INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            action TEXT NOT NULL,
            "table" TEXT NOT NULL,
            record_id TEXT NOT NULL,
            actor TEXT NOT NULL,
            detail TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::storage("failed to create audit_log table", e))?;

    Ok(())
}
