//! Typed lifecycle events published on [`crate::ports::events::EventBus`].
//! Listeners match on an explicit variant set — no raw function-pointer
//! callbacks — so adding a new event is a breaking, checked change rather
//! than a silent behavior shift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PatternId, Tier, VariantId};

/// System-wide lifecycle events for decoupled observer communication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DomainEvent {
    /// A pattern was admitted and stored.
    PatternAdded {
        /// The new pattern's id.
        id: PatternId,
        /// Tier it was written to.
        tier: Tier,
    },
    /// A caller reported usage feedback.
    Feedback {
        /// Pattern the feedback applies to.
        id: PatternId,
        /// Whether the usage succeeded.
        succeeded: bool,
    },
    /// A healing pass started on a pattern.
    HealingStart {
        /// Pattern being healed.
        id: PatternId,
    },
    /// A healing pass recorded progress on one loop iteration.
    HealingProgress {
        /// Pattern being healed.
        id: PatternId,
        /// 1-based loop index.
        loop_index: u32,
        /// Coherency total achieved by this iteration's best candidate.
        coherency: f64,
    },
    /// A healing pass finished (successfully or not).
    HealingComplete {
        /// Pattern healed.
        id: PatternId,
        /// Whether any improving variant was found.
        improved: bool,
        /// Final coherency total.
        final_coherency: f64,
    },
    /// A healed variant was swapped in to replace its parent's code.
    AutoPromote {
        /// Pattern promoted.
        id: PatternId,
        /// Variant that was promoted.
        variant_id: VariantId,
    },
    /// A promoted variant was rolled back after test verification failed.
    Rollback {
        /// Pattern rolled back.
        id: PatternId,
        /// Reason for the rollback.
        reason: String,
    },
    /// A client voted on a pattern's usefulness (reserved for future
    /// community ranking signals; not consumed by the core ranking path).
    Vote {
        /// Pattern voted on.
        id: PatternId,
        /// `true` for upvote.
        positive: bool,
    },
    /// The safety gate vetoed a submission.
    SecurityVeto {
        /// Violated principle name.
        principle: String,
    },
}

impl DomainEvent {
    /// Stable event-kind name, used for logging and metrics labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PatternAdded { .. } => "pattern_added",
            Self::Feedback { .. } => "feedback",
            Self::HealingStart { .. } => "healing_start",
            Self::HealingProgress { .. } => "healing_progress",
            Self::HealingComplete { .. } => "healing_complete",
            Self::AutoPromote { .. } => "auto_promote",
            Self::Rollback { .. } => "rollback",
            Self::Vote { .. } => "vote",
            Self::SecurityVeto { .. } => "security_veto",
        }
    }
}

/// An event together with the wall-clock time it was published, as stored
/// by in-memory event history consumers (e.g. tests).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimestampedEvent {
    /// When [`DomainEvent`] was published.
    pub at: DateTime<Utc>,
    /// The event itself.
    pub event: DomainEvent,
}
