//! Wire types for the Friction REST API.
//!
//! Shared by the client core and its tests so request bodies and response
//! shapes cannot drift apart. The remote service stays the authority on
//! validation; `validate` here only catches requests it would certainly reject.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MOMENTS_PATH: &str = "/api/moments";
pub const SNAPSHOT_RUN_PATH: &str = "/api/snapshots/run";
pub const FINDINGS_PATH: &str = "/api/findings";
pub const WHO_AM_I_PATH: &str = "/api/me";

/// Trigger type sent with every client-initiated snapshot run.
pub const MANUAL_TRIGGER: &str = "manual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Highlight,
    BulkPaste,
}

/// Review status of a finding as tracked by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Unreviewed,
    Confirmed,
    Deferred,
    Resolved,
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FindingStatus::Unreviewed => "unreviewed",
            FindingStatus::Confirmed => "confirmed",
            FindingStatus::Deferred => "deferred",
            FindingStatus::Resolved => "resolved",
        };
        f.write_str(label)
    }
}

/// The `state` values accepted by `GET /api/findings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    Unreviewed,
    Confirmed,
    Deferred,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::Unreviewed,
        StatusFilter::Confirmed,
        StatusFilter::Deferred,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Unreviewed => "unreviewed",
            StatusFilter::Confirmed => "confirmed",
            StatusFilter::Deferred => "deferred",
        }
    }

    /// Status a finding listed under this filter is assumed to carry when
    /// the payload omits it.
    pub fn implied_status(self) -> FindingStatus {
        match self {
            StatusFilter::Unreviewed => FindingStatus::Unreviewed,
            StatusFilter::Confirmed => FindingStatus::Confirmed,
            StatusFilter::Deferred => FindingStatus::Deferred,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unreviewed" => Some(StatusFilter::Unreviewed),
            "confirmed" => Some(StatusFilter::Confirmed),
            "deferred" => Some(StatusFilter::Deferred),
            _ => None,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review transition, addressed as `POST /api/findings/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Confirm,
    Defer,
    Resolve,
}

impl ReviewAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Confirm => "confirm",
            ReviewAction::Defer => "defer",
            ReviewAction::Resolve => "resolve",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirm" | "accept" => Some(ReviewAction::Confirm),
            "defer" | "ignore" => Some(ReviewAction::Defer),
            "resolve" => Some(ReviewAction::Resolve),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn findings_query_path(filter: StatusFilter) -> String {
    format!("{}?state={}", FINDINGS_PATH, filter.as_str())
}

/// The id is percent-encoded as a single path segment.
pub fn transition_path(finding_id: &str, action: ReviewAction) -> String {
    format!(
        "{}/{}/{}",
        FINDINGS_PATH,
        urlencoding::encode(finding_id),
        action.as_str()
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateMomentRequest {
    pub raw_text: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub created_at: String,
}

impl CreateMomentRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.raw_text.trim().is_empty() {
            return Err("raw_text is required".to_string());
        }
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err("created_at must be RFC3339".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSnapshotRequest {
    pub trigger_type: String,
}

impl RunSnapshotRequest {
    pub fn manual() -> Self {
        Self {
            trigger_type: MANUAL_TRIGGER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsResponse {
    #[serde(default)]
    pub findings: Vec<FindingRecord>,
}

/// One finding as the API returns it. Every field except the id is optional
/// because older snapshots omit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindingRecord {
    #[serde(alias = "id")]
    pub finding_id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub confidence_ai: Option<String>,
    #[serde(default)]
    pub recall_anchor: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub snapshot_created_at: Option<String>,
    #[serde(default, alias = "state")]
    pub status: Option<FindingStatus>,
}
