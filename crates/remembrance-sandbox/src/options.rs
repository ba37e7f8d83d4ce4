//! Per-invocation sandbox options.

use remembrance_domain::constants::{DEFAULT_SANDBOX_OUTPUT_CAP_BYTES, DEFAULT_SANDBOX_TIMEOUT_MS};

/// Bounds applied to a single runner invocation.
#[derive(Debug, Clone, Copy)]
pub struct SandboxOptions {
    /// Hard wall-clock limit before the process is killed.
    pub timeout_ms: u64,
    /// Captured output beyond this many bytes is truncated.
    pub output_cap_bytes: usize,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SANDBOX_TIMEOUT_MS,
            output_cap_bytes: DEFAULT_SANDBOX_OUTPUT_CAP_BYTES,
        }
    }
}

pub(crate) fn truncate(mut output: String, cap: usize) -> String {
    if output.len() > cap {
        output.truncate(cap);
        output.push_str("\n...[truncated]");
    }
    output
}
