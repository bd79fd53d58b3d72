//! Review transitions for a single finding.
//!
//! Which buttons a finding shows depends only on the chip the user is
//! viewing, not on the finding itself:
//!
//! ```text
//! unreviewed view → confirm, defer
//! deferred view   → confirm
//! confirmed view  → resolve
//! ```
//!
//! The server owns `status`. After a transition is accepted (or the session
//! turns out to be dead) the caller must re-fetch the findings list; the
//! cache is never patched locally.

use friction_protocol::{ReviewAction, StatusFilter};

use crate::error::{Result, SyncError};
use crate::remote::{RemoteApi, RemoteOutcome};

pub fn available_actions(view: StatusFilter) -> Vec<ReviewAction> {
    match view {
        StatusFilter::Unreviewed => vec![ReviewAction::Confirm, ReviewAction::Defer],
        StatusFilter::Deferred => vec![ReviewAction::Confirm],
        StatusFilter::Confirmed => vec![ReviewAction::Resolve],
    }
}

pub fn is_available(view: StatusFilter, action: ReviewAction) -> bool {
    available_actions(view).contains(&action)
}

/// Result of a transition request that reached the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Applied,
    Unauthorized,
    Failed(String),
}

impl ReviewOutcome {
    /// True when the caller must re-fetch findings before showing them again.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, ReviewOutcome::Applied | ReviewOutcome::Unauthorized)
    }
}

/// Validates `action` against the current view, then sends it. Invalid
/// actions fail with `InvalidTransition` before anything goes on the wire.
pub fn apply<R: RemoteApi + ?Sized>(
    remote: &R,
    token: &str,
    view: StatusFilter,
    finding_id: &str,
    action: ReviewAction,
) -> Result<ReviewOutcome> {
    if !is_available(view, action) {
        return Err(SyncError::InvalidTransition {
            action,
            filter: view,
        });
    }

    tracing::debug!(finding_id, action = %action, "Applying review transition");
    Ok(match remote.transition_finding(token, finding_id, action) {
        RemoteOutcome::Ok(()) => ReviewOutcome::Applied,
        RemoteOutcome::Unauthorized => ReviewOutcome::Unauthorized,
        RemoteOutcome::Failure(reason) => ReviewOutcome::Failed(reason),
    })
}
