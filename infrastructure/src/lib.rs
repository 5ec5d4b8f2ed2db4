//! Infrastructure layer for chorus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: vendor HTTP clients, embedding backends,
//! configuration file loading and the JSONL conversation log.

pub mod config;
pub mod embedding;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, EmbeddingKind, FileAggregationConfig, FileConfig, FileEmbeddingConfig,
    FileLoggingConfig, FileOutputConfig, FileProviderConfig, FileRateLimitConfig, FileRetryConfig,
    FileServerConfig, ProviderKind,
};
pub use embedding::{CohereEmbedder, OpenAiEmbedder};
pub use logging::JsonlConversationLogger;
pub use providers::{
    CohereProvider, GeminiProvider, HttpProviderError, OpenAiCompatibleProvider, build_client,
    build_providers, build_scorer,
};
