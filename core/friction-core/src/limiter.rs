//! Minimum-interval gate for capture actions.
//!
//! Guards against a held or double-pressed capture shortcut producing
//! duplicate moments. Purely in-memory: a restart forgets the last capture.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    Allowed,
    Denied { retry_in: Duration },
}

#[derive(Debug, Clone)]
pub struct CaptureLimiter {
    cooldown: Duration,
    last_success_at: Option<Instant>,
}

impl CaptureLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_success_at: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_success_at(&self) -> Option<Instant> {
        self.last_success_at
    }

    /// Checks whether a capture may start at `now`. Does not reserve
    /// anything: only [`record_success`](Self::record_success) moves the window.
    pub fn try_acquire(&self, now: Instant) -> Acquire {
        let Some(last) = self.last_success_at else {
            return Acquire::Allowed;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.cooldown {
            Acquire::Denied {
                retry_in: self.cooldown - elapsed,
            }
        } else {
            Acquire::Allowed
        }
    }

    /// Call only once the remote has confirmed the capture. Older
    /// timestamps never move the window backwards.
    pub fn record_success(&mut self, now: Instant) {
        self.last_success_at = Some(match self.last_success_at {
            Some(last) if last > now => last,
            _ => now,
        });
    }
}
