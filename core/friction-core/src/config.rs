//! Client configuration loading and saving.
//!
//! `config.json` under the data root holds endpoints and timings. Missing or
//! corrupt files fall back to defaults; environment variables override
//! whatever the file says.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::storage::StorageConfig;

pub const DEFAULT_API_BASE: &str = "https://friction-production.up.railway.app";
pub const DEFAULT_REPORTS_URL: &str = "https://nofriction.netlify.app/reports";
pub const DEFAULT_CAPTURE_COOLDOWN_MS: u64 = 3000;
pub const DEFAULT_STATUS_TTL_MS: u64 = 2000;
pub const DEFAULT_BADGE_TTL_MS: u64 = 1200;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

const API_BASE_ENV: &str = "FRICTION_API_BASE";
const REPORTS_URL_ENV: &str = "FRICTION_REPORTS_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub reports_url: String,
    pub capture_cooldown_ms: u64,
    pub status_ttl_ms: u64,
    pub badge_ttl_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            reports_url: DEFAULT_REPORTS_URL.to_string(),
            capture_cooldown_ms: DEFAULT_CAPTURE_COOLDOWN_MS,
            status_ttl_ms: DEFAULT_STATUS_TTL_MS,
            badge_ttl_ms: DEFAULT_BADGE_TTL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn capture_cooldown(&self) -> Duration {
        Duration::from_millis(self.capture_cooldown_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }

    pub fn badge_ttl(&self) -> Duration {
        Duration::from_millis(self.badge_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API base without a trailing slash, so paths can be appended verbatim.
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_env(API_BASE_ENV) {
            self.api_base = value;
        }
        if let Some(value) = non_empty_env(REPORTS_URL_ENV) {
            self.reports_url = value;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Loads the client configuration, returning defaults if the file doesn't
/// exist or can't be parsed. Environment overrides are applied last.
pub fn load_client_config(storage: &StorageConfig) -> ClientConfig {
    let mut config = load_stored_client_config(storage);
    config.apply_env_overrides();
    config
}

/// The configuration as written in `config.json`, without environment
/// overrides. Edit this one before saving.
pub fn load_stored_client_config(storage: &StorageConfig) -> ClientConfig {
    read_config_file(storage).unwrap_or_default()
}

fn read_config_file(storage: &StorageConfig) -> Option<ClientConfig> {
    let path = storage.config_file();
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Ignoring malformed client config");
            None
        }
    }
}

/// Saves the client configuration to disk.
pub fn save_client_config(storage: &StorageConfig, config: &ClientConfig) -> Result<()> {
    let path = storage.config_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SyncError::ConfigWriteFailed {
            path: path.clone(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|source| SyncError::Json {
        context: "serialize client config".to_string(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| SyncError::ConfigWriteFailed { path, source })
}
