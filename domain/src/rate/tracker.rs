//! Hourly request budget for a single session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Requests a non-premium session may issue per window.
pub const DEFAULT_HOURLY_LIMIT: u32 = 15;

/// Outcome of asking the rate gate for admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Admission {
    Allowed,
    /// Not an error: the request is simply not processed.
    Rejected(String),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }

    /// The fixed explanation shown to a session that ran out of budget.
    pub fn limit_reached(limit: u32) -> Self {
        Admission::Rejected(format!(
            "You have reached the hourly limit of {} requests. Please try again later.",
            limit
        ))
    }
}

/// Per-session request counter over a one-hour window.
///
/// The counter restarts whenever a request arrives one hour or more after
/// the window started. Premium trackers are never capped and never count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTracker {
    count: u32,
    window_start: DateTime<Utc>,
    premium: bool,
}

impl RateTracker {
    pub fn new(now: DateTime<Utc>, premium: bool) -> Self {
        Self {
            count: 0,
            window_start: now,
            premium,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    /// Count one request at `now` against `limit`.
    ///
    /// A rejected request still counts, so a session hammering the gate
    /// stays rejected until the window rolls over.
    pub fn register(&mut self, now: DateTime<Utc>, limit: u32) -> Admission {
        if self.premium {
            return Admission::Allowed;
        }

        if now.signed_duration_since(self.window_start) >= Duration::hours(1) {
            self.count = 0;
            self.window_start = now;
        }

        self.count = self.count.saturating_add(1);
        if self.count > limit {
            Admission::limit_reached(limit)
        } else {
            Admission::Allowed
        }
    }
}
