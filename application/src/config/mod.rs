//! Application-level configuration.
//!
//! - [`AggregationConfig`] - rate budget, retry policy and selection policy
//!   for the ask use case

pub mod aggregation;

pub use aggregation::AggregationConfig;
