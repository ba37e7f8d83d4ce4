//! Conversions between domain entities and their flat row representation.
//! Everything structured (tags, evolution history, the coherency score)
//! round-trips through JSON text columns; enums round-trip through their
//! lowercase name.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use remembrance_domain::entities::{
    AuditLogEntry, DebugCategory, DebugPattern, HealedVariant, HealingStats, Pattern, PatternStatus,
};
use remembrance_domain::value_objects::{CoherencyScore, DebugPatternId, Language, PatternId, VariantId};
use remembrance_domain::{Error, Result};
use uuid::Uuid;

pub(crate) fn status_to_str(status: PatternStatus) -> &'static str {
    match status {
        PatternStatus::Candidate => "candidate",
        PatternStatus::Proven => "proven",
        PatternStatus::Retired => "retired",
    }
}

pub(crate) fn status_from_str(raw: &str) -> Result<PatternStatus> {
    match raw {
        "candidate" => Ok(PatternStatus::Candidate),
        "proven" => Ok(PatternStatus::Proven),
        "retired" => Ok(PatternStatus::Retired),
        other => Err(Error::storage_msg(format!("unknown pattern status in store: {other}"))),
    }
}

pub(crate) fn category_to_str(category: DebugCategory) -> &'static str {
    match category {
        DebugCategory::Syntax => "syntax",
        DebugCategory::Type => "type",
        DebugCategory::Reference => "reference",
        DebugCategory::Logic => "logic",
        DebugCategory::Runtime => "runtime",
        DebugCategory::Build => "build",
        DebugCategory::Network => "network",
        DebugCategory::Permission => "permission",
        DebugCategory::Async => "async",
        DebugCategory::Data => "data",
    }
}

pub(crate) fn category_from_str(raw: &str) -> Result<DebugCategory> {
    match raw {
        "syntax" => Ok(DebugCategory::Syntax),
        "type" => Ok(DebugCategory::Type),
        "reference" => Ok(DebugCategory::Reference),
        "logic" => Ok(DebugCategory::Logic),
        "runtime" => Ok(DebugCategory::Runtime),
        "build" => Ok(DebugCategory::Build),
        "network" => Ok(DebugCategory::Network),
        "permission" => Ok(DebugCategory::Permission),
        "async" => Ok(DebugCategory::Async),
        "data" => Ok(DebugCategory::Data),
        other => Err(Error::storage_msg(format!("unknown debug category in store: {other}"))),
    }
}

/// Raw column tuple for one `patterns` row, in table-declaration order.
pub(crate) type PatternRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    i64,
    i64,
    Option<String>,
    String,
    Option<String>,
    String,
    String,
);

pub(crate) fn pattern_to_row(pattern: &Pattern) -> Result<PatternRow> {
    Ok((
        pattern.id.to_string(),
        pattern.name.clone(),
        pattern.language.as_str().to_owned(),
        pattern.code.clone(),
        pattern.test_code.clone(),
        pattern.description.clone(),
        serde_json::to_string(&pattern.tags)?,
        pattern.pattern_type.clone(),
        pattern.complexity.clone(),
        serde_json::to_string(&pattern.coherency_score)?,
        i64::from(pattern.test_passed),
        pattern.author.clone(),
        pattern.usage_count as i64,
        pattern.success_count as i64,
        pattern.last_used.map(|t| t.to_rfc3339()),
        pattern.created_at.to_rfc3339(),
        pattern.parent_pattern_id.map(|id| id.to_string()),
        serde_json::to_string(&pattern.evolution_history.iter().map(ToString::to_string).collect::<Vec<_>>())?,
        status_to_str(pattern.status).to_owned(),
    ))
}

pub(crate) fn row_to_pattern(row: PatternRow) -> Result<Pattern> {
    let (
        id,
        name,
        language,
        code,
        test_code,
        description,
        tags,
        pattern_type,
        complexity,
        coherency_score,
        test_passed,
        author,
        usage_count,
        success_count,
        last_used,
        created_at,
        parent_pattern_id,
        evolution_history,
        status,
    ) = row;

    let evolution_history: Vec<String> = serde_json::from_str(&evolution_history)?;

    Ok(Pattern {
        id: PatternId::from(parse_uuid(&id)?),
        name,
        language: Language::from_str(&language)?,
        code,
        test_code,
        description,
        tags: serde_json::from_str(&tags)?,
        pattern_type,
        complexity,
        coherency_score: serde_json::from_str(&coherency_score)?,
        test_passed: test_passed != 0,
        author,
        usage_count: usage_count as u64,
        success_count: success_count as u64,
        last_used: last_used.map(|raw| parse_timestamp(&raw)).transpose()?,
        created_at: parse_timestamp(&created_at)?,
        parent_pattern_id: parent_pattern_id.map(|raw| parse_uuid(&raw)).transpose()?.map(PatternId::from),
        evolution_history: evolution_history
            .into_iter()
            .map(|raw| parse_uuid(&raw).map(PatternId::from))
            .collect::<Result<Vec<_>>>()?,
        status: status_from_str(&status)?,
    })
}

pub(crate) type HealedVariantRow = (String, String, String, f64, f64, i64, String, String, String);

pub(crate) fn variant_to_row(variant: &HealedVariant) -> HealedVariantRow {
    (
        variant.id.to_string(),
        variant.parent_pattern_id.to_string(),
        variant.healed_code.clone(),
        variant.original_coherency,
        variant.healed_coherency,
        variant.healing_loops as i64,
        variant.healing_strategy.clone(),
        variant.whisper.clone(),
        variant.healed_at.to_rfc3339(),
    )
}

pub(crate) fn row_to_variant(row: HealedVariantRow) -> Result<HealedVariant> {
    let (id, parent_pattern_id, healed_code, original_coherency, healed_coherency, healing_loops, healing_strategy, whisper, healed_at) = row;
    Ok(HealedVariant {
        id: VariantId::from(parse_uuid(&id)?),
        parent_pattern_id: PatternId::from(parse_uuid(&parent_pattern_id)?),
        healed_code,
        original_coherency,
        healed_coherency,
        healing_loops: healing_loops as u32,
        healing_strategy,
        whisper,
        healed_at: parse_timestamp(&healed_at)?,
    })
}

pub(crate) type HealingStatsRow = (i64, i64, f64, f64);

pub(crate) fn row_to_healing_stats(row: HealingStatsRow) -> HealingStats {
    let (attempts, successes, peak_coherency, last_delta_best) = row;
    HealingStats {
        pattern_id_attempts: attempts as u64,
        attempts: attempts as u64,
        successes: successes as u64,
        peak_coherency,
        last_delta_best,
    }
}

pub(crate) type DebugPatternRow = (String, String, String, Option<String>, String, String, String, f64, i64, i64);

pub(crate) fn debug_pattern_to_row(pattern: &DebugPattern) -> DebugPatternRow {
    (
        pattern.id.to_string(),
        pattern.fingerprint.clone(),
        pattern.error_message.clone(),
        pattern.stack_trace.clone(),
        pattern.fix_code.clone(),
        pattern.language.as_str().to_owned(),
        category_to_str(pattern.category).to_owned(),
        pattern.confidence,
        pattern.times_applied as i64,
        pattern.times_resolved as i64,
    )
}

pub(crate) fn row_to_debug_pattern(row: DebugPatternRow) -> Result<DebugPattern> {
    let (id, fingerprint, error_message, stack_trace, fix_code, language, category, confidence, times_applied, times_resolved) = row;
    Ok(DebugPattern {
        id: DebugPatternId::from(parse_uuid(&id)?),
        fingerprint,
        error_message,
        stack_trace,
        fix_code,
        language: Language::from_str(&language)?,
        category: category_from_str(&category)?,
        confidence,
        times_applied: times_applied as u64,
        times_resolved: times_resolved as u64,
    })
}

pub(crate) type AuditLogRow = (String, String, String, String, String, String);

pub(crate) fn audit_to_row(entry: &AuditLogEntry) -> AuditLogRow {
    (
        entry.timestamp.to_rfc3339(),
        entry.action.clone(),
        entry.table.clone(),
        entry.record_id.clone(),
        entry.actor.clone(),
        entry.detail.clone(),
    )
}

pub(crate) fn row_to_audit(row: AuditLogRow) -> Result<AuditLogEntry> {
    let (timestamp, action, table, record_id, actor, detail) = row;
    Ok(AuditLogEntry {
        timestamp: parse_timestamp(&timestamp)?,
        action,
        table,
        record_id,
        actor,
        detail,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::storage("corrupt identifier in store", e))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::storage("corrupt timestamp in store", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [PatternStatus::Candidate, PatternStatus::Proven, PatternStatus::Retired] {
            assert_eq!(status_from_str(status_to_str(status)).unwrap(), status);
        }
    }

    #[test]
    fn category_round_trips() {
        for category in [DebugCategory::Syntax, DebugCategory::Async, DebugCategory::Data] {
            assert_eq!(category_from_str(category_to_str(category)).unwrap(), category);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(status_from_str("deleted").is_err());
    }
}
