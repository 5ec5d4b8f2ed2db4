//! Generation provider adapters
//!
//! Each adapter implements [`GenerationProvider`](chorus_application::GenerationProvider)
//! for one vendor wire protocol. Credentials come from the environment
//! variable named in the provider's config entry. The news adapter takes
//! part in the fanout as a context-only participant.

pub mod cohere;
pub mod error;
pub mod gemini;
pub mod http;
pub mod news;
pub mod openai_compatible;
pub mod registry;

pub use cohere::CohereProvider;
pub use error::HttpProviderError;
pub use gemini::GeminiProvider;
pub use http::build_client;
pub use news::NewsContextProvider;
pub use openai_compatible::OpenAiCompatibleProvider;
pub use registry::{build_providers, build_scorer};
