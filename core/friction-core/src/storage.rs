//! Storage configuration and path management for the Friction client.
//!
//! Production code uses `StorageConfig::resolve()` which honours
//! `FRICTION_HOME` and otherwise points to `~/.friction/`.
//! Tests use `StorageConfig::with_root(temp_dir)` for isolation.

use std::env;
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "FRICTION_HOME";
const DEFAULT_DIR_NAME: &str = ".friction";

/// Central configuration for all client storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the data root from the environment, falling back to the
    /// home directory. Returns `None` only when neither is available.
    pub fn resolve() -> Option<Self> {
        if let Ok(root) = env::var(HOME_ENV) {
            let trimmed = root.trim();
            if !trimmed.is_empty() {
                return Some(Self::with_root(PathBuf::from(trimmed)));
            }
        }
        dirs::home_dir().map(|home| Self::with_root(home.join(DEFAULT_DIR_NAME)))
    }

    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to session.json (auth token and theme).
    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    /// Path to config.json (endpoints and timings).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to the logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
