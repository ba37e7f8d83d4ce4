//! JSON snapshots of the whole store, written before a bulk mutation
//! (`prune`, a future schema migration). Snapshots never participate in
//! reads; they exist purely so an operator can recover from a bad prune
//! by hand.

use std::path::{Path, PathBuf};

use remembrance_domain::entities::{AuditLogEntry, DebugPattern, HealedVariant, Pattern};
use remembrance_domain::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    patterns: &'a [Pattern],
    healed_variants: &'a [HealedVariant],
    debug_patterns: &'a [DebugPattern],
    audit_log: &'a [AuditLogEntry],
}

/// Write a full snapshot under `base_dir/backups/<timestamp>-<reason>/`.
/// Returns the directory written to.
pub fn write_snapshot(
    base_dir: &Path,
    reason: &str,
    patterns: &[Pattern],
    healed_variants: &[HealedVariant],
    debug_patterns: &[DebugPattern],
    audit_log: &[AuditLogEntry],
) -> Result<PathBuf> {
    let slug: String = reason.chars().map(|c| if c.is_alphanumeric() { c } else { '-' }).collect();
    let dir = base_dir.join("backups").join(format!("{}-{slug}", chrono::Utc::now().timestamp()));
    std::fs::create_dir_all(&dir).map_err(|e| Error::IoFailure { path: dir.display().to_string(), kind: e.kind().to_string() })?;

    let snapshot = Snapshot {
        patterns,
        healed_variants,
        debug_patterns,
        audit_log,
    };
    let body = serde_json::to_vec_pretty(&snapshot)?;

    let file = dir.join("snapshot.json");
    std::fs::write(&file, body).map_err(|e| Error::IoFailure { path: file.display().to_string(), kind: e.kind().to_string() })?;

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_timestamped_directory_with_snapshot_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_snapshot(tmp.path(), "pre-prune", &[], &[], &[], &[]).unwrap();
        assert!(dir.join("snapshot.json").is_file());
        assert!(dir.strip_prefix(tmp.path()).unwrap().starts_with("backups"));
    }

    #[test]
    fn reason_is_slugified() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_snapshot(tmp.path(), "pre prune!", &[], &[], &[], &[]).unwrap();
        let name = dir.file_name().unwrap().to_str().unwrap();
        assert!(!name.contains(' '));
        assert!(!name.contains('!'));
    }
}
