//! Agreement scoring: embeddings, cosine similarity, contribution weights.

pub mod contribution;
pub mod similarity;

pub use contribution::Contributions;
pub use similarity::{EmbeddingVector, cosine_similarity};
