//! Layered configuration: built-in defaults, overridden by an optional
//! TOML file, overridden again by `REMEMBRANCE_*` environment variables.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use remembrance_domain::constants::{
    DEFAULT_ADMISSION_THRESHOLD, DEFAULT_FEDERATION_TIMEOUT_MS, DEFAULT_HEAL_TARGET, DEFAULT_MAX_HEALS_PER_RUN,
    DEFAULT_MAX_HEAL_LOOPS_PULL, DEFAULT_PROMOTE_THRESHOLD, DEFAULT_SANDBOX_TIMEOUT_MS,
};
use remembrance_domain::{Error, Result};
use serde::{Deserialize, Serialize};

/// The configuration table enumerated in spec §6, plus the `baseDir`
/// a running instance persists its store under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemembranceConfig {
    /// Minimum composite coherency required to store a submission at all.
    pub admission_threshold: f64,
    /// Score at/above which `HealingSupervisor` skips a pattern.
    pub heal_target: f64,
    /// Score at/above which a healed variant is swapped in.
    pub promote_threshold: f64,
    /// Patterns considered per `HealingSupervisor::run_once` invocation.
    pub max_heals_per_run: usize,
    /// Reflection loop iterations per healing attempt.
    pub max_heal_loops: u32,
    /// Sandbox wall-clock timeout in milliseconds.
    pub sandbox_timeout_ms: u64,
    /// Per-remote-tier federation timeout in milliseconds.
    pub federation_timeout_ms: u64,
    /// Admission/healing worker pool size.
    pub worker_pool_size: usize,
    /// Directory the local store's `patterns.db` and `backups/` live
    /// under.
    pub base_dir: String,
}

impl Default for RemembranceConfig {
    fn default() -> Self {
        Self {
            admission_threshold: DEFAULT_ADMISSION_THRESHOLD,
            heal_target: DEFAULT_HEAL_TARGET,
            promote_threshold: DEFAULT_PROMOTE_THRESHOLD,
            max_heals_per_run: DEFAULT_MAX_HEALS_PER_RUN,
            max_heal_loops: DEFAULT_MAX_HEAL_LOOPS_PULL,
            sandbox_timeout_ms: DEFAULT_SANDBOX_TIMEOUT_MS,
            federation_timeout_ms: DEFAULT_FEDERATION_TIMEOUT_MS,
            worker_pool_size: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            base_dir: ".remembrance".to_owned(),
        }
    }
}

impl RemembranceConfig {
    /// Load defaults, layer an optional TOML file over them, then layer
    /// `REMEMBRANCE_*` environment variables over the result.
    pub fn load(toml_path: Option<&str>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = toml_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("REMEMBRANCE_"));

        figment.extract().map_err(|e| Error::storage_msg(format!("failed to load configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let config = RemembranceConfig::default();
        assert_eq!(config.admission_threshold, 0.6);
        assert_eq!(config.heal_target, 0.85);
        assert_eq!(config.promote_threshold, 0.9);
        assert_eq!(config.max_heals_per_run, 20);
    }

    #[test]
    fn env_override_takes_precedence() {
        std::env::set_var("REMEMBRANCE_ADMISSION_THRESHOLD", "0.75");
        let config = RemembranceConfig::load(None).unwrap();
        assert_eq!(config.admission_threshold, 0.75);
        std::env::remove_var("REMEMBRANCE_ADMISSION_THRESHOLD");
    }
}
