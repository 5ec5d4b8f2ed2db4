//! Embedding adapters

pub mod cohere;
pub mod openai;

pub use cohere::CohereEmbedder;
pub use openai::OpenAiEmbedder;
