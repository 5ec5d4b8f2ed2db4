//! Prompt domain
//!
//! Templates for provider requests and the re-synthesis call.

mod template;

pub use template::PromptTemplate;
