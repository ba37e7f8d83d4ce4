//! Spawns a prepared command under the sandbox's timeout and output-size
//! bounds, without leaving zombie processes behind on timeout.

use std::time::Instant;

use remembrance_domain::Result;
use tokio::process::Command;
use tokio::time::Duration;

use crate::options::{truncate, SandboxOptions};
use crate::result::SandboxResult;

/// Runs `command` to completion or until `options.timeout_ms` elapses,
/// whichever comes first.
pub async fn run_with_timeout(mut command: Command, options: SandboxOptions) -> Result<SandboxResult> {
    command.kill_on_drop(true);
    let started = Instant::now();

    let outcome = tokio::time::timeout(Duration::from_millis(options.timeout_ms), command.output()).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Err(_elapsed) => Ok(SandboxResult::timed_out(String::new(), duration_ms)),
        Ok(Err(io_err)) => Err(remembrance_domain::Error::IoFailure {
            path: "<sandbox child>".to_owned(),
            kind: io_err.kind().to_string(),
        }),
        Ok(Ok(output)) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            let combined = truncate(combined, options.output_cap_bytes);
            if output.status.success() {
                Ok(SandboxResult::passed(combined, duration_ms))
            } else {
                Ok(SandboxResult::failed(combined, duration_ms))
            }
        }
    }
}
