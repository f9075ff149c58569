//! ============================================================================
//! Configuration - Runtime settings with environment overrides
//! ============================================================================
//! BRAINNOVA_DB_PATH               database file (default ~/.brainnova/brainnova.redb)
//! BRAINNOVA_LOOKUP_URL            summary endpoint for web-augmented mode
//! BRAINNOVA_LOOKUP_TIMEOUT_SECS   per-request timeout
//! BRAINNOVA_MODE                  starting mode (v1/v2/v6)
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::lookup::DEFAULT_SUMMARY_URL;
use crate::mode::Mode;

/// Default lookup timeout in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainConfig {
    /// Database file; None means ~/.brainnova/brainnova.redb
    pub db_path: Option<PathBuf>,
    /// Summary endpoint queried in web-augmented mode
    pub lookup_url: String,
    /// Per-request lookup timeout
    pub lookup_timeout_secs: u64,
    /// Mode the session starts in
    pub mode: Mode,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            lookup_url: DEFAULT_SUMMARY_URL.to_string(),
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            mode: Mode::Standard,
        }
    }
}

impl BrainConfig {
    /// Defaults overridden by BRAINNOVA_* environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `get` returns for each variable.
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = get("BRAINNOVA_DB_PATH").filter(|p| !p.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(url) = get("BRAINNOVA_LOOKUP_URL").filter(|u| !u.is_empty()) {
            config.lookup_url = url;
        }

        if let Some(raw) = get("BRAINNOVA_LOOKUP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.lookup_timeout_secs = secs,
                _ => warn!("Ignoring invalid BRAINNOVA_LOOKUP_TIMEOUT_SECS: {}", raw),
            }
        }

        if let Some(raw) = get("BRAINNOVA_MODE") {
            match raw.parse::<Mode>() {
                Ok(mode) => config.mode = mode,
                Err(e) => warn!("Ignoring BRAINNOVA_MODE: {}", e),
            }
        }

        config
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}
