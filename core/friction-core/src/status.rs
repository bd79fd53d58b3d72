//! Transient user-facing status text.
//!
//! Each write carries its own expiry deadline; a newer write replaces both
//! the message and the deadline. Nothing is queued.

use serde::Serialize;
use std::time::{Duration, Instant};

pub const BADGE_MAX_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone)]
struct Pending {
    message: StatusMessage,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    ttl: Duration,
    pending: Option<Pending>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: None,
        }
    }

    /// Shows `text` until `now + ttl`. Empty text clears immediately.
    pub fn set(&mut self, text: impl Into<String>, tone: Tone, now: Instant) {
        let text = text.into();
        self.pending = if text.is_empty() {
            None
        } else {
            Some(Pending {
                message: StatusMessage { text, tone },
                expires_at: now + self.ttl,
            })
        };
    }

    /// The visible message at `now`, if its deadline has not passed.
    pub fn current_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.pending
            .as_ref()
            .filter(|pending| now < pending.expires_at)
            .map(|pending| &pending.message)
    }
}

/// Short badge text for the background capture surface.
#[derive(Debug, Clone)]
pub struct Badge {
    line: StatusLine,
}

impl Badge {
    pub fn new(ttl: Duration) -> Self {
        Self {
            line: StatusLine::new(ttl),
        }
    }

    pub fn set(&mut self, text: &str, now: Instant) {
        let short: String = text.chars().take(BADGE_MAX_CHARS).collect();
        self.line.set(short, Tone::Info, now);
    }

    pub fn text_at(&self, now: Instant) -> Option<&str> {
        self.line.current_at(now).map(|message| message.text.as_str())
    }
}
