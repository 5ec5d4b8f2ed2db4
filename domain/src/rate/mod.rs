//! Rate limiting domain: per-session hourly request budgets.

pub mod tracker;

pub use tracker::{Admission, DEFAULT_HOURLY_LIMIT, RateTracker};
