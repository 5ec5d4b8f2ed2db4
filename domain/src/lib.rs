//! Domain layer for chorus
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fanout and reconciliation
//!
//! A question is posed to several independent generation providers at once.
//! Their answers are embedded, compared by cosine similarity, and reconciled
//! into one final answer:
//!
//! - **Reference** (default): the earliest valid answer anchors the
//!   comparison and the answer closest to it wins
//! - **Resynthesis**: a designated provider merges every valid answer
//!
//! ## Contributions
//!
//! Every provider with a computable similarity receives a percentage share
//! of the final answer; shares sum to 100.
//!
//! ## Rate budget
//!
//! Each session may issue a fixed number of requests per hour. Premium
//! sessions are never capped.

pub mod aggregation;
pub mod config;
pub mod core;
pub mod prompt;
pub mod rate;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use aggregation::{
    AggregationResult, ERROR_MARKER, ProviderOutcome, ProviderResponse, ReferenceSelection,
    SelectionPolicy, SharedConversation, contributions_against, select_by_reference,
    valid_by_arrival,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    language::Language,
    provider::ProviderName,
    question::Question,
    string::{preview, truncate},
};
pub use prompt::PromptTemplate;
pub use rate::{Admission, DEFAULT_HOURLY_LIMIT, RateTracker};
pub use scoring::{Contributions, EmbeddingVector, cosine_similarity};
pub use session::{Conversation, Role, SessionKey, Turn};
