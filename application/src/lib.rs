//! Application layer for chorus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use config::AggregationConfig;
pub use ports::{
    clock::{Clock, SystemClock},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    embedding::{EmbeddingError, EmbeddingProvider},
    generation::{DEFAULT_PROVIDER_TIMEOUT, GenerationProvider, ProviderError},
    progress::{NoProgress, ProgressNotifier},
};
pub use retry::{RetryPolicy, RetryableError, retry_with_backoff};
pub use session::{RateGate, SessionStore};
pub use use_cases::ask::{AskError, AskInput, AskOutcome, AskUseCase};
pub use use_cases::scoring::{DEFAULT_EMBEDDING_TIMEOUT, EmbeddingScorer};
pub use use_cases::selection::Selector;
