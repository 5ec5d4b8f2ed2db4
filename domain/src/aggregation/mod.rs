//! Aggregation subdomain
//!
//! Turns the per-provider outcomes of one fanout into a single answer.

pub mod policy;
pub mod selection;
pub mod shared;
pub mod value_objects;

pub use policy::SelectionPolicy;
pub use selection::{ReferenceSelection, contributions_against, select_by_reference, valid_by_arrival};
pub use shared::SharedConversation;
pub use value_objects::{AggregationResult, ERROR_MARKER, ProviderOutcome, ProviderResponse};
