//! File-backed session persistence: one bearer token and a theme preference.
//!
//! # File Format
//!
//! ```json
//! { "authToken": "tok_...", "theme": "dark" }
//! ```
//!
//! Both keys are optional. A missing token means "logged out"; a missing
//! theme means `system`.
//!
//! # Defensive Loading
//!
//! Other processes may write this file at any time, so:
//! - Missing or empty files load as an empty session
//! - Corrupt JSON loads as an empty session (logged at warn)
//! - A blank stored token is treated as absent
//!
//! # Atomic Writes
//!
//! Uses temp file + rename so a reader never sees a half-written session.
//!
//! # Notifications
//!
//! Every token write (including the forced clear after a 401) and every theme
//! write is broadcast to subscribers after it has been persisted.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use tempfile::NamedTempFile;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    /// system → light → dark → system
    pub fn next(self) -> Theme {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    TokenChanged { present: bool },
    ThemeChanged(Theme),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
}

impl SessionFile {
    fn normalized(mut self) -> Self {
        if self
            .auth_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            self.auth_token = None;
        }
        self
    }
}

/// The single process-wide session, optionally backed by a file.
///
/// Create with [`SessionStore::load`] to read from disk,
/// or [`SessionStore::new_in_memory`] for tests.
pub struct SessionStore {
    state: SessionFile,
    file_path: Option<PathBuf>,
    subscribers: Vec<Sender<SessionChange>>,
}

impl SessionStore {
    pub fn new_in_memory() -> Self {
        SessionStore {
            state: SessionFile::default(),
            file_path: None,
            subscribers: Vec::new(),
        }
    }

    /// Loads the session file. Never fails: unreadable state degrades to an
    /// empty session so the user can simply log in again.
    pub fn load(file_path: &Path) -> Self {
        SessionStore {
            state: read_session_file(file_path),
            file_path: Some(file_path.to_path_buf()),
            subscribers: Vec::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.state.auth_token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.state.auth_token.is_some()
    }

    /// Stores a trimmed token. Blank input fails with `InvalidToken` and
    /// leaves the stored session untouched.
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SyncError::InvalidToken);
        }

        let previous = self.state.auth_token.replace(trimmed.to_string());
        if let Err(err) = self.save() {
            self.state.auth_token = previous;
            return Err(err);
        }

        tracing::info!("Session token saved");
        self.emit(SessionChange::TokenChanged { present: true });
        Ok(())
    }

    /// Removes the token. The in-memory session is cleared even when the
    /// write fails, so a rejected token is never reused by this process.
    pub fn clear_token(&mut self) -> Result<()> {
        self.state.auth_token = None;
        let saved = self.save();
        tracing::info!("Session token cleared");
        self.emit(SessionChange::TokenChanged { present: false });
        saved
    }

    pub fn theme(&self) -> Theme {
        self.state.theme.unwrap_or_default()
    }

    pub fn cycle_theme(&mut self) -> Result<Theme> {
        let previous = self.state.theme;
        let next = self.theme().next();
        self.state.theme = Some(next);
        if let Err(err) = self.save() {
            self.state.theme = previous;
            return Err(err);
        }
        self.emit(SessionChange::ThemeChanged(next));
        Ok(next)
    }

    /// Re-reads the backing file so changes made by another process become
    /// visible. Emits a notification for every key that changed.
    pub fn reload(&mut self) {
        let Some(path) = self.file_path.clone() else {
            return;
        };
        let fresh = read_session_file(&path);
        let token_changed = fresh.auth_token != self.state.auth_token;
        let theme_changed = fresh.theme != self.state.theme;
        self.state = fresh;

        if token_changed {
            tracing::debug!("Session token changed on disk");
            self.emit(SessionChange::TokenChanged {
                present: self.has_token(),
            });
        }
        if theme_changed {
            self.emit(SessionChange::ThemeChanged(self.theme()));
        }
    }

    pub fn subscribe(&mut self) -> Receiver<SessionChange> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    fn emit(&mut self, change: SessionChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change).is_ok());
    }

    fn save(&self) -> Result<()> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(&self.state).map_err(|source| {
            SyncError::Json {
                context: "serialize session".to_string(),
                source,
            }
        })?;

        let parent_dir = file_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir).map_err(|source| io_error("create session dir", source))?;

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|source| io_error("create temp session file", source))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|source| io_error("write temp session file", source))?;
        temp_file
            .flush()
            .map_err(|source| io_error("flush temp session file", source))?;
        temp_file
            .persist(file_path)
            .map_err(|err| io_error("persist session file", err.error))?;

        Ok(())
    }
}

fn io_error(context: &str, source: std::io::Error) -> SyncError {
    SyncError::Io {
        context: context.to_string(),
        source,
    }
}

fn read_session_file(path: &Path) -> SessionFile {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return SessionFile::default(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read session file, starting logged out");
            return SessionFile::default();
        }
    };

    if content.trim().is_empty() {
        return SessionFile::default();
    }

    match serde_json::from_str::<SessionFile>(&content) {
        Ok(file) => file.normalized(),
        Err(err) => {
            tracing::warn!(error = %err, "Corrupt session file, starting logged out");
            SessionFile::default()
        }
    }
}
