//! Assembles every component crate behind the public Remembrance API:
//! configuration, the admission pipeline, the healing supervisor, the
//! worker pool, and the `Core` facade itself.

pub mod config;
pub mod core;
pub mod healing;
pub mod pipeline;
pub mod workers;

pub use config::RemembranceConfig;
pub use core::{CaptureResult, ConfidenceUpdate, Core, HealTarget, ReliabilityUpdate};
pub use healing::{HealingOptions, HealingOutcome, HealingReport, HealingSupervisor};
pub use pipeline::{AdmissionPipeline, AdmissionResult, RejectionReason, SubmissionMetadata};
pub use workers::WorkerPool;
