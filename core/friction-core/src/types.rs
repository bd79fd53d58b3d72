//! Domain types shared by the controller and its front ends.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use friction_protocol::{CreateMomentRequest, FindingRecord, FindingStatus, SourceType, StatusFilter};

// ═══════════════════════════════════════════════════════════════════════════════
// Moments
// ═══════════════════════════════════════════════════════════════════════════════

/// Where a capture came from. A highlight may carry the page it was taken on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSource {
    Highlight { url: Option<String> },
    BulkPaste,
}

impl CaptureSource {
    pub fn source_type(&self) -> SourceType {
        match self {
            CaptureSource::Highlight { .. } => SourceType::Highlight,
            CaptureSource::BulkPaste => SourceType::BulkPaste,
        }
    }

    fn source_url(&self) -> Option<String> {
        match self {
            CaptureSource::Highlight { url } => url.clone(),
            CaptureSource::BulkPaste => None,
        }
    }
}

/// A captured snippet. Sent once and then forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    pub raw_text: String,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Moment {
    /// Builds a moment from already-trimmed, non-empty text.
    pub fn new(raw_text: String, source: &CaptureSource, created_at: DateTime<Utc>) -> Self {
        Self {
            raw_text,
            source_type: source.source_type(),
            source_url: source.source_url(),
            created_at,
        }
    }

    pub fn to_request(&self) -> CreateMomentRequest {
        CreateMomentRequest {
            raw_text: self.raw_text.clone(),
            source_type: self.source_type,
            source_url: self.source_url.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Findings
// ═══════════════════════════════════════════════════════════════════════════════

/// Client-side copy of a server finding. `status` is advisory between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub kind: String,
    pub topic: Option<String>,
    pub summary: Option<String>,
    pub confidence: Option<String>,
    pub recall_anchor: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: FindingStatus,
}

impl Finding {
    /// Converts a wire record fetched under `filter`. Unparseable timestamps
    /// become `None`, which the cache treats as "always current".
    pub fn from_record(record: FindingRecord, filter: StatusFilter) -> Self {
        let created_at = non_blank(record.created_at.as_deref())
            .or(non_blank(record.snapshot_created_at.as_deref()))
            .and_then(parse_timestamp);

        Self {
            id: record.finding_id,
            kind: record.kind.unwrap_or_default(),
            topic: record.topic,
            summary: record.summary,
            confidence: record.confidence_ai.or(record.confidence),
            recall_anchor: record.recall_anchor,
            created_at,
            status: record.status.unwrap_or_else(|| filter.implied_status()),
        }
    }

    /// Text searched by the free-text query.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.topic.as_deref().unwrap_or(""),
            self.summary.as_deref().unwrap_or(""),
            self.recall_anchor.as_deref().unwrap_or("")
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses RFC 3339, or a naive timestamp which is read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Connectivity
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    Connected,
    #[default]
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Disconnected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FindingRecord {
        FindingRecord {
            finding_id: id.to_string(),
            ..FindingRecord::default()
        }
    }

    #[test]
    fn test_highlight_moment_keeps_url() {
        let source = CaptureSource::Highlight {
            url: Some("https://example.com/a".to_string()),
        };
        let moment = Moment::new("text".to_string(), &source, Utc::now());
        let request = moment.to_request();
        assert_eq!(request.source_type, SourceType::Highlight);
        assert_eq!(request.source_url.as_deref(), Some("https://example.com/a"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_bulk_paste_moment_has_no_url() {
        let moment = Moment::new("text".to_string(), &CaptureSource::BulkPaste, Utc::now());
        assert_eq!(moment.source_type, SourceType::BulkPaste);
        assert!(moment.source_url.is_none());
    }

    #[test]
    fn test_finding_prefers_ai_confidence_and_created_at() {
        let mut raw = record("f-1");
        raw.confidence = Some("low".to_string());
        raw.confidence_ai = Some("high".to_string());
        raw.created_at = Some("2026-03-01T10:00:00Z".to_string());
        raw.snapshot_created_at = Some("2026-02-01T10:00:00Z".to_string());

        let finding = Finding::from_record(raw, StatusFilter::Unreviewed);
        assert_eq!(finding.confidence.as_deref(), Some("high"));
        assert_eq!(
            finding.created_at,
            parse_timestamp("2026-03-01T10:00:00Z")
        );
    }

    #[test]
    fn test_finding_falls_back_to_snapshot_timestamp() {
        let mut raw = record("f-1");
        raw.snapshot_created_at = Some("2026-02-01 10:00:00".to_string());
        let finding = Finding::from_record(raw, StatusFilter::Unreviewed);
        assert!(finding.created_at.is_some());
    }

    #[test]
    fn test_blank_created_at_falls_back_to_snapshot_timestamp() {
        let mut raw = record("f-1");
        raw.created_at = Some("  ".to_string());
        raw.snapshot_created_at = Some("2026-02-01T10:00:00Z".to_string());

        let finding = Finding::from_record(raw, StatusFilter::Unreviewed);
        assert_eq!(finding.created_at, parse_timestamp("2026-02-01T10:00:00Z"));
    }

    #[test]
    fn test_finding_status_defaults_to_filter() {
        let finding = Finding::from_record(record("f-1"), StatusFilter::Deferred);
        assert_eq!(finding.status, FindingStatus::Deferred);

        let mut raw = record("f-2");
        raw.status = Some(FindingStatus::Resolved);
        let finding = Finding::from_record(raw, StatusFilter::Confirmed);
        assert_eq!(finding.status, FindingStatus::Resolved);
    }

    #[test]
    fn test_unparseable_timestamp_becomes_none() {
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let parsed = parse_timestamp("2026-03-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_haystack_tolerates_missing_fields() {
        let mut finding = Finding::from_record(record("f-1"), StatusFilter::Unreviewed);
        finding.summary = Some("Slow checkout".to_string());
        assert_eq!(finding.haystack(), " Slow checkout ");
    }
}
