//! Plain-text rendering of controller state.

use std::fmt::Write;
use std::time::Instant;

use friction_core::{Connectivity, Finding, FindingsView, RemoteApi, ReviewAction, SyncController};

pub fn findings(view: &FindingsView, actions: &[ReviewAction]) -> String {
    if view.is_empty() {
        return "No findings.\n".to_string();
    }

    let actions = actions
        .iter()
        .map(|action| action.as_str())
        .collect::<Vec<_>>()
        .join(" | ");

    let mut out = String::new();
    for (group, items) in view.groups() {
        let _ = writeln!(out, "{}", group.label());
        for finding in items {
            write_finding(&mut out, finding);
            if !actions.is_empty() {
                let _ = writeln!(out, "      > {}", actions);
            }
        }
    }
    out
}

fn write_finding(out: &mut String, finding: &Finding) {
    let title = finding
        .topic
        .as_deref()
        .or(finding.summary.as_deref())
        .unwrap_or(&finding.kind);
    let _ = write!(out, "  {}  {}", finding.id, title);
    if let Some(confidence) = finding.confidence.as_deref() {
        let _ = write!(out, " [{}]", confidence);
    }
    out.push('\n');

    if finding.topic.is_some() {
        if let Some(summary) = finding.summary.as_deref() {
            let _ = writeln!(out, "      {}", summary);
        }
    }
    if let Some(anchor) = finding.recall_anchor.as_deref() {
        let _ = writeln!(out, "      \"{}\"", anchor);
    }
}

pub fn connection<R: RemoteApi>(controller: &SyncController<R>) -> String {
    let token = if controller.session().has_token() {
        "saved"
    } else {
        "missing"
    };
    format!(
        "{} {} (token {}, theme {})",
        connectivity_marker(controller.connectivity()),
        controller.connectivity().label(),
        token,
        controller.theme()
    )
}

/// The transient status line, if one is still showing.
pub fn status<R: RemoteApi>(controller: &SyncController<R>) -> Option<String> {
    controller
        .status_at(Instant::now())
        .map(|message| message.text.clone())
}

fn connectivity_marker(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Connected => "●",
        Connectivity::Disconnected => "○",
    }
}
