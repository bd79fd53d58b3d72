//! `reqwest` implementation of [`RemoteApi`].

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;

use friction_protocol::{
    findings_query_path, transition_path, FindingsResponse, ReviewAction, RunSnapshotRequest,
    StatusFilter, MOMENTS_PATH, SNAPSHOT_RUN_PATH, WHO_AM_I_PATH,
};

use super::{RemoteApi, RemoteOutcome};
use crate::config::ClientConfig;
use crate::error::{Result, SyncError};
use crate::types::{Finding, Moment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Unauthorized,
    Failure,
}

/// 401 → Unauthorized, 2xx → Success, everything else → Failure.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        401 => StatusClass::Unauthorized,
        200..=299 => StatusClass::Success,
        _ => StatusClass::Failure,
    }
}

pub struct HttpRemoteClient {
    http: Client,
    api_base: String,
}

impl HttpRemoteClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(SyncError::HttpClient)?;

        Ok(Self {
            http,
            api_base: config.api_base().to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn send(&self, request: RequestBuilder, token: &str, label: &str) -> RemoteOutcome<Response> {
        let response = match request.bearer_auth(token).send() {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, operation = label, "Remote request failed");
                return RemoteOutcome::Failure(format!("{}: {}", label, err));
            }
        };

        let status = response.status();
        tracing::debug!(status = status.as_u16(), operation = label, "Remote response");
        match classify_status(status.as_u16()) {
            StatusClass::Success => RemoteOutcome::Ok(response),
            StatusClass::Unauthorized => RemoteOutcome::Unauthorized,
            StatusClass::Failure => RemoteOutcome::Failure(format!("{}: {}", label, describe(status))),
        }
    }

    /// For endpoints whose body we ignore: any 2xx counts, empty or not.
    fn send_discarding_body(
        &self,
        request: RequestBuilder,
        token: &str,
        label: &str,
    ) -> RemoteOutcome<()> {
        self.send(request, token, label).map(|_| ())
    }
}

fn describe(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

impl RemoteApi for HttpRemoteClient {
    fn create_moment(&self, token: &str, moment: &Moment) -> RemoteOutcome<()> {
        let body = moment.to_request();
        if let Err(reason) = body.validate() {
            return RemoteOutcome::Failure(format!("create_moment: {}", reason));
        }
        let request = self.http.post(self.url(MOMENTS_PATH)).json(&body);
        self.send_discarding_body(request, token, "create_moment")
    }

    fn run_snapshot(&self, token: &str) -> RemoteOutcome<()> {
        let request = self
            .http
            .post(self.url(SNAPSHOT_RUN_PATH))
            .json(&RunSnapshotRequest::manual());
        self.send_discarding_body(request, token, "run_snapshot")
    }

    fn list_findings(&self, token: &str, filter: StatusFilter) -> RemoteOutcome<Vec<Finding>> {
        let request = self.http.get(self.url(&findings_query_path(filter)));
        let response = match self.send(request, token, "list_findings") {
            RemoteOutcome::Ok(response) => response,
            RemoteOutcome::Unauthorized => return RemoteOutcome::Unauthorized,
            RemoteOutcome::Failure(reason) => return RemoteOutcome::Failure(reason),
        };

        let body = match response.text() {
            Ok(body) => body,
            Err(err) => return RemoteOutcome::Failure(format!("list_findings: {}", err)),
        };
        match serde_json::from_str::<FindingsResponse>(&body) {
            Ok(parsed) => RemoteOutcome::Ok(
                parsed
                    .findings
                    .into_iter()
                    .map(|record| Finding::from_record(record, filter))
                    .collect(),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "Findings payload did not parse");
                RemoteOutcome::Failure(format!("list_findings: invalid payload: {}", err))
            }
        }
    }

    fn transition_finding(
        &self,
        token: &str,
        finding_id: &str,
        action: ReviewAction,
    ) -> RemoteOutcome<()> {
        let request = self.http.post(self.url(&transition_path(finding_id, action)));
        self.send_discarding_body(request, token, "transition_finding")
    }

    fn who_am_i(&self, token: &str) -> RemoteOutcome<serde_json::Value> {
        let request = self.http.get(self.url(WHO_AM_I_PATH));
        self.send(request, token, "who_am_i").map(|response| {
            response
                .text()
                .ok()
                .and_then(|body| serde_json::from_str(&body).ok())
                .unwrap_or(serde_json::Value::Null)
        })
    }
}
