//! Typed access to the remote API.
//!
//! Every call resolves to exactly one of three outcomes. A 401 is kept apart
//! from other failures because it is the only signal that the session is
//! dead; the controller reacts to it centrally. Nothing here retries.

mod http;

pub use http::{classify_status, HttpRemoteClient, StatusClass};

use friction_protocol::{ReviewAction, StatusFilter};

use crate::types::{Finding, Moment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome<T> {
    Ok(T),
    Unauthorized,
    Failure(String),
}

impl<T> RemoteOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteOutcome<U> {
        match self {
            RemoteOutcome::Ok(value) => RemoteOutcome::Ok(f(value)),
            RemoteOutcome::Unauthorized => RemoteOutcome::Unauthorized,
            RemoteOutcome::Failure(reason) => RemoteOutcome::Failure(reason),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RemoteOutcome::Ok(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteOutcome::Unauthorized)
    }
}

/// One method per remote operation. The bearer token is read from the
/// session store by the caller at call time and passed through unchanged.
pub trait RemoteApi {
    fn create_moment(&self, token: &str, moment: &Moment) -> RemoteOutcome<()>;

    fn run_snapshot(&self, token: &str) -> RemoteOutcome<()>;

    fn list_findings(&self, token: &str, filter: StatusFilter) -> RemoteOutcome<Vec<Finding>>;

    fn transition_finding(
        &self,
        token: &str,
        finding_id: &str,
        action: ReviewAction,
    ) -> RemoteOutcome<()>;

    /// Session liveness check. The payload is informational only.
    fn who_am_i(&self, token: &str) -> RemoteOutcome<serde_json::Value>;
}
