//! Append-only audit trail. Every mutation of Pattern/Candidate/
//! HealedVariant emits one `AuditLogEntry`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,
    /// What happened (`"add"`, `"update"`, `"retire"`, `"heal"`, ...).
    pub action: String,
    /// Which logical table the record belongs to (`"patterns"`,
    /// `"healed_variants"`, ...).
    pub table: String,
    /// Identifier of the affected record, stringified.
    pub record_id: String,
    /// Who or what performed the action (`"pipeline"`, `"healing"`,
    /// a user id, ...).
    pub actor: String,
    /// Free-form detail, usually a short JSON blob.
    pub detail: String,
}

impl AuditLogEntry {
    /// Build an entry stamped with the current time.
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        table: impl Into<String>,
        record_id: impl Into<String>,
        actor: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            table: table.into(),
            record_id: record_id.into(),
            actor: actor.into(),
            detail: detail.into(),
        }
    }
}
