//! The outcome of one sandboxed execution.

use serde::{Deserialize, Serialize};

/// Why a sandboxed process stopped short of a clean exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Killed after exceeding the wall-clock timeout.
    TimedOut,
    /// Terminated by the host OS (e.g. out-of-memory kill).
    Killed,
}

/// Outcome of running `testCode` against `code` for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxResult {
    /// Whether the test process exited successfully.
    pub passed: bool,
    /// Captured stdout+stderr, truncated to the configured output cap.
    pub output: String,
    /// Always `true`: every runner executes inside the per-invocation
    /// temporary directory and restricted environment.
    pub sandboxed: bool,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Present only when the process did not exit on its own.
    pub signal: Option<Signal>,
}

impl SandboxResult {
    /// A passing result with no abnormal signal.
    #[must_use]
    pub fn passed(output: String, duration_ms: u64) -> Self {
        Self {
            passed: true,
            output,
            sandboxed: true,
            duration_ms,
            signal: None,
        }
    }

    /// A failing result with no abnormal signal (e.g. non-zero exit).
    #[must_use]
    pub fn failed(output: String, duration_ms: u64) -> Self {
        Self {
            passed: false,
            output,
            sandboxed: true,
            duration_ms,
            signal: None,
        }
    }

    /// A failing result that was killed for exceeding its timeout.
    #[must_use]
    pub fn timed_out(output: String, duration_ms: u64) -> Self {
        Self {
            passed: false,
            output,
            sandboxed: true,
            duration_ms,
            signal: Some(Signal::TimedOut),
        }
    }
}
