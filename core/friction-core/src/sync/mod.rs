//! SyncController - the single entry point for every user gesture.
//!
//! Composes the session store, remote client, capture limiter, findings
//! cache and review workflow. Each public method is one flow and runs to
//! completion before returning; there is no background work and no locking.
//!
//! # Unauthorized recovery
//!
//! Any 401 from any call goes through one path: the token is cleared (and
//! persisted), the cached findings are dropped, connectivity flips to
//! `Disconnected`, and the status reads "Token invalid. Login again.".
//!
//! # Refresh after mutation
//!
//! Review transitions, report runs and successful pastes re-fetch the whole
//! findings list for the active chip. The server is the only authority on
//! status, so the cache is never patched in place.


use std::sync::mpsc::Receiver;
use std::time::Instant;

use chrono::Utc;
use friction_protocol::{ReviewAction, StatusFilter};

use crate::config::ClientConfig;
use crate::error::{Result, SyncError};
use crate::findings::{FindingsCache, FindingsQuery, FindingsView};
use crate::limiter::{Acquire, CaptureLimiter};
use crate::remote::{RemoteApi, RemoteOutcome};
use crate::review::{self, ReviewOutcome};
use crate::session::{SessionChange, SessionStore, Theme};
use crate::status::{Badge, StatusLine, StatusMessage, Tone};
use crate::types::{CaptureSource, Connectivity, Moment};

pub const MSG_EMPTY_CAPTURE: &str = "Paste something first.";
pub const MSG_NO_SESSION: &str = "Missing token. Paste it once below.";
pub const MSG_RATE_LIMITED: &str = "Wait a moment before capturing again.";
pub const MSG_SESSION_INVALID: &str = "Token invalid. Login again.";
pub const MSG_SAVING: &str = "Saving...";
pub const MSG_SAVE_FAILED: &str = "Save failed.";
pub const MSG_SAVED: &str = "Moment saved.";
pub const MSG_GENERATING: &str = "Generating...";
pub const MSG_REPORT_OPENED: &str = "Opened report.";
pub const MSG_OPEN_FAILED: &str = "Could not open reports.";
pub const MSG_TOKEN_REQUIRED: &str = "Token required.";
pub const MSG_TOKEN_SAVED: &str = "Token saved.";
pub const MSG_LOGGED_OUT: &str = "Logged out.";
pub const MSG_UPDATE_FAILED: &str = "Update failed.";

/// Opens the web report destination. Owned by the front end.
pub trait ReportOpener {
    fn open(&self, url: &str) -> std::result::Result<(), String>;
}

/// What a findings refresh did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded(usize),
    NoSession,
    SessionExpired,
    Failed(String),
}

/// Result of a report run that got past the session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRun {
    pub snapshot_started: bool,
    pub opened: bool,
}

pub struct SyncController<R: RemoteApi> {
    session: SessionStore,
    session_changes: Receiver<SessionChange>,
    observed_token: Option<String>,
    rejected_token: Option<String>,
    remote: R,
    limiter: CaptureLimiter,
    cache: FindingsCache,
    query: FindingsQuery,
    status: StatusLine,
    badge: Badge,
    connectivity: Connectivity,
    reports_url: String,
    opener: Box<dyn ReportOpener>,
}

impl<R: RemoteApi> SyncController<R> {
    pub fn new(
        mut session: SessionStore,
        remote: R,
        config: &ClientConfig,
        opener: Box<dyn ReportOpener>,
    ) -> Self {
        let session_changes = session.subscribe();
        let observed_token = session.token().map(str::to_owned);
        Self {
            session,
            session_changes,
            observed_token,
            rejected_token: None,
            remote,
            limiter: CaptureLimiter::new(config.capture_cooldown()),
            cache: FindingsCache::new(),
            query: FindingsQuery::default(),
            status: StatusLine::new(config.status_ttl()),
            badge: Badge::new(config.badge_ttl()),
            connectivity: Connectivity::Disconnected,
            reports_url: config.reports_url.clone(),
            opener,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read-only state for the front end
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn limiter(&self) -> &CaptureLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &FindingsCache {
        &self.cache
    }

    pub fn query(&self) -> &FindingsQuery {
        &self.query
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn theme(&self) -> Theme {
        self.session.theme()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.status.current_at(now)
    }

    pub fn badge_at(&self, now: Instant) -> Option<&str> {
        self.badge.text_at(now)
    }

    /// The grouped findings for the active chip and query.
    pub fn view(&self) -> FindingsView {
        self.cache.view(&self.query)
    }

    pub fn available_actions(&self) -> Vec<ReviewAction> {
        review::available_actions(self.query.status)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Capture
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn capture(&mut self, text: &str, source: CaptureSource) -> Result<()> {
        self.capture_at(text, source, Instant::now())
    }

    /// Capture flow: empty check, session check, cooldown, then one remote
    /// call. The cooldown window starts when the remote confirms the save,
    /// not when the request was sent.
    pub fn capture_at(&mut self, text: &str, source: CaptureSource, now: Instant) -> Result<()> {
        let is_highlight = matches!(source, CaptureSource::Highlight { .. });
        let raw_text = text.trim();

        if raw_text.is_empty() {
            self.report_capture(MSG_EMPTY_CAPTURE, Tone::Error, is_highlight.then_some("No selection"));
            return Err(SyncError::EmptyCapture);
        }

        let Some(token) = self.session.token().map(str::to_owned) else {
            self.report_capture(MSG_NO_SESSION, Tone::Error, is_highlight.then_some("No token"));
            return Err(SyncError::NoSession);
        };

        if let Acquire::Denied { retry_in } = self.limiter.try_acquire(now) {
            tracing::debug!(retry_in_ms = retry_in.as_millis() as u64, "Capture rate limited");
            self.report_capture(MSG_RATE_LIMITED, Tone::Error, is_highlight.then_some("Wait"));
            return Err(SyncError::RateLimited { retry_in });
        }

        self.set_status(MSG_SAVING, Tone::Info);
        let moment = Moment::new(raw_text.to_string(), &source, Utc::now());

        let result = match self.remote.create_moment(&token, &moment) {
            RemoteOutcome::Ok(()) => {
                self.limiter.record_success(Instant::now().max(now));
                tracing::info!(source_type = ?moment.source_type, chars = raw_text.chars().count(), "Moment captured");
                self.report_capture(MSG_SAVED, Tone::Success, is_highlight.then_some("Saved"));
                if !is_highlight {
                    self.refresh_findings();
                }
                Ok(())
            }
            RemoteOutcome::Unauthorized => {
                self.handle_unauthorized();
                if is_highlight {
                    self.badge.set("Auth", Instant::now());
                }
                Err(SyncError::NoSession)
            }
            RemoteOutcome::Failure(reason) => {
                tracing::warn!(reason = %reason, "Moment save failed");
                self.report_capture(MSG_SAVE_FAILED, Tone::Error, is_highlight.then_some("Error"));
                Err(SyncError::Transient(reason))
            }
        };

        self.check_connection();
        result
    }

    fn report_capture(&mut self, message: &str, tone: Tone, badge: Option<&str>) {
        self.set_status(message, tone);
        if let Some(badge) = badge {
            self.badge.set(badge, Instant::now());
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────────

    /// Starts a snapshot run and opens the reports page. Only a 401 stops
    /// the flow; a failed run still navigates to the reports.
    pub fn generate_report(&mut self) -> Result<ReportRun> {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.set_status(MSG_NO_SESSION, Tone::Error);
            return Err(SyncError::NoSession);
        };

        self.set_status(MSG_GENERATING, Tone::Info);
        let snapshot_started = match self.remote.run_snapshot(&token) {
            RemoteOutcome::Ok(()) => true,
            RemoteOutcome::Unauthorized => {
                self.handle_unauthorized();
                self.check_connection();
                return Err(SyncError::NoSession);
            }
            RemoteOutcome::Failure(reason) => {
                tracing::warn!(reason = %reason, "Snapshot run failed, opening reports anyway");
                false
            }
        };

        let opened = self.open_reports();
        if opened {
            self.set_status(MSG_REPORT_OPENED, Tone::Success);
        }
        self.refresh_findings();
        self.check_connection();

        Ok(ReportRun {
            snapshot_started,
            opened,
        })
    }

    /// Opens the reports page without touching the API.
    pub fn open_reports(&mut self) -> bool {
        match self.opener.open(&self.reports_url) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, url = %self.reports_url, "Failed to open reports");
                self.set_status(MSG_OPEN_FAILED, Tone::Error);
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Findings
    // ─────────────────────────────────────────────────────────────────────────────

    /// Re-fetches the active chip. Anything but a successful fetch leaves the
    /// cache empty, so a failed refresh never shows stale rows as current.
    pub fn refresh_findings(&mut self) -> RefreshOutcome {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.cache.clear();
            return RefreshOutcome::NoSession;
        };

        let filter = self.query.status;
        match self.remote.list_findings(&token, filter) {
            RemoteOutcome::Ok(items) => {
                let count = items.len();
                tracing::debug!(filter = %filter, count, "Findings refreshed");
                self.cache.replace(filter, items);
                RefreshOutcome::Loaded(count)
            }
            RemoteOutcome::Unauthorized => {
                self.handle_unauthorized();
                RefreshOutcome::SessionExpired
            }
            RemoteOutcome::Failure(reason) => {
                tracing::warn!(filter = %filter, reason = %reason, "Findings refresh failed");
                self.cache.clear();
                RefreshOutcome::Failed(reason)
            }
        }
    }

    /// Switches the status chip and re-fetches.
    pub fn set_filter(&mut self, filter: StatusFilter) -> RefreshOutcome {
        self.query.status = filter;
        self.refresh_findings()
    }

    /// Changes the search text. Purely local.
    pub fn set_query(&mut self, text: impl Into<String>) -> FindingsView {
        self.query.text = text.into();
        self.view()
    }

    /// Applies a review action from the active chip, then re-fetches.
    pub fn review(&mut self, finding_id: &str, action: ReviewAction) -> Result<ReviewOutcome> {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.set_status(MSG_NO_SESSION, Tone::Error);
            return Err(SyncError::NoSession);
        };

        let outcome = review::apply(&self.remote, &token, self.query.status, finding_id, action)?;
        match &outcome {
            ReviewOutcome::Applied => {
                tracing::info!(finding_id, action = %action, "Finding updated");
                self.set_status(review_message(action), Tone::Success);
            }
            ReviewOutcome::Unauthorized => self.handle_unauthorized(),
            ReviewOutcome::Failed(reason) => {
                tracing::warn!(finding_id, action = %action, reason = %reason, "Finding update failed");
                self.set_status(MSG_UPDATE_FAILED, Tone::Error);
            }
        }

        if outcome.requires_refresh() {
            self.refresh_findings();
        }
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────────

    /// Liveness check against `/api/me`.
    pub fn check_connection(&mut self) -> Connectivity {
        let Some(token) = self.session.token().map(str::to_owned) else {
            self.connectivity = Connectivity::Disconnected;
            return self.connectivity;
        };

        self.connectivity = match self.remote.who_am_i(&token) {
            RemoteOutcome::Ok(_) => Connectivity::Connected,
            RemoteOutcome::Unauthorized => {
                self.handle_unauthorized();
                Connectivity::Disconnected
            }
            RemoteOutcome::Failure(reason) => {
                tracing::debug!(reason = %reason, "Connectivity check failed");
                Connectivity::Disconnected
            }
        };
        self.connectivity
    }

    pub fn save_token(&mut self, token: &str) -> Result<()> {
        if let Err(err) = self.session.set_token(token) {
            let message = match err {
                SyncError::InvalidToken => MSG_TOKEN_REQUIRED,
                _ => MSG_SAVE_FAILED,
            };
            self.set_status(message, Tone::Error);
            return Err(err);
        }
        self.observed_token = self.session.token().map(str::to_owned);
        self.rejected_token = None;
        self.drain_session_changes();

        self.set_status(MSG_TOKEN_SAVED, Tone::Success);
        self.refresh_findings();
        self.check_connection();
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        let cleared = self.session.clear_token();
        self.observed_token = None;
        self.drain_session_changes();
        self.cache.clear();
        self.set_status(MSG_LOGGED_OUT, Tone::Success);
        self.check_connection();
        cleared
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.session.cycle_theme()?;
        self.set_status(format!("Theme: {}", theme), Tone::Success);
        Ok(theme)
    }

    /// Picks up token changes made elsewhere (another window, another
    /// process) and brings findings and connectivity in line with them.
    /// Returns true when a resync happened.
    pub fn sync_session_changes(&mut self) -> bool {
        self.session.reload();
        if !self.drain_session_changes() {
            return false;
        }

        let current = self.session.token().map(str::to_owned);
        if current.is_some() && current == self.rejected_token {
            tracing::debug!("Ignoring previously rejected token from disk");
            if let Err(err) = self.session.clear_token() {
                tracing::warn!(error = %err, "Failed to persist session clear");
            }
            self.drain_session_changes();
            return false;
        }
        if current == self.observed_token {
            return false;
        }

        tracing::info!(present = current.is_some(), "Session changed elsewhere, resyncing");
        self.observed_token = current;
        self.refresh_findings();
        self.check_connection();
        true
    }

    fn drain_session_changes(&mut self) -> bool {
        let mut token_changed = false;
        while let Ok(change) = self.session_changes.try_recv() {
            if matches!(change, SessionChange::TokenChanged { .. }) {
                token_changed = true;
            }
        }
        token_changed
    }

    fn handle_unauthorized(&mut self) {
        tracing::warn!("Remote rejected session token, logging out");
        self.rejected_token = self.session.token().map(str::to_owned);
        if let Err(err) = self.session.clear_token() {
            tracing::error!(error = %err, "Failed to persist session clear");
        }
        self.observed_token = None;
        self.drain_session_changes();
        self.cache.clear();
        self.connectivity = Connectivity::Disconnected;
        self.set_status(MSG_SESSION_INVALID, Tone::Error);
    }

    fn set_status(&mut self, text: impl Into<String>, tone: Tone) {
        self.status.set(text, tone, Instant::now());
    }
}

fn review_message(action: ReviewAction) -> &'static str {
    match action {
        ReviewAction::Confirm => "Accepted.",
        ReviewAction::Defer => "Ignored.",
        ReviewAction::Resolve => "Resolved.",
    }
}
