//! Embedding scorer
//!
//! Attaches an embedding to every valid scored answer. Embedding failures
//! are logged and leave that answer without a vector.

use crate::ports::embedding::{EmbeddingError, EmbeddingProvider};
use chorus_domain::{EmbeddingVector, ProviderResponse};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Budget for one embedding call when none is configured.
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct EmbeddingScorer {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl Default for EmbeddingScorer {
    fn default() -> Self {
        Self {
            embedder: None,
            timeout: DEFAULT_EMBEDDING_TIMEOUT,
        }
    }
}

impl EmbeddingScorer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder: Some(embedder),
            ..Self::default()
        }
    }

    /// Builder: cap every embedding call at `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scorer that never produces vectors
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.embedder.is_some()
    }

    /// Embed every valid answer concurrently.
    pub async fn embed_answers(&self, responses: Vec<ProviderResponse>) -> Vec<ProviderResponse> {
        let Some(embedder) = &self.embedder else {
            return responses;
        };

        let timeout = self.timeout;
        let pending = responses.into_iter().map(|response| {
            let embedder = Arc::clone(embedder);
            async move {
                if !response.scored {
                    return response;
                }
                let Some(text) = response.answer_text().map(str::to_owned) else {
                    return response;
                };
                match embed_within(&*embedder, timeout, &text).await {
                    Ok(vector) => {
                        debug!(provider = %response.provider, dims = vector.len(), "Embedded answer");
                        response.with_embedding(vector)
                    }
                    Err(e) => {
                        warn!(provider = %response.provider, "Embedding failed: {}", e);
                        response
                    }
                }
            }
        });

        join_all(pending).await
    }

    /// Embed a single text, e.g. a synthesized answer.
    pub async fn embed_text(&self, text: &str) -> Option<EmbeddingVector> {
        let embedder = self.embedder.as_ref()?;
        match embed_within(&**embedder, self.timeout, text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(model = embedder.model_name(), "Embedding failed: {}", e);
                None
            }
        }
    }
}

async fn embed_within(
    embedder: &dyn EmbeddingProvider,
    timeout: Duration,
    text: &str,
) -> Result<EmbeddingVector, EmbeddingError> {
    tokio::time::timeout(timeout, embedder.embed(text))
        .await
        .map_err(|_| EmbeddingError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::embedding::EmbeddingError;
    use async_trait::async_trait;

    struct Unit;

    #[async_trait]
    impl EmbeddingProvider for Unit {
        fn model_name(&self) -> &str {
            "unit"
        }

        async fn embed(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            Ok(EmbeddingVector::new(vec![1.0, 0.0]))
        }
    }

    #[tokio::test]
    async fn test_only_scored_answers_are_embedded() {
        let scorer = EmbeddingScorer::new(Arc::new(Unit));
        let responses = vec![
            ProviderResponse::answer("A", "Paris.", 0),
            ProviderResponse::answer("News", "Recent News Context:", 1).context_only(),
            ProviderResponse::failure("B", "timeout", 2),
        ];

        let embedded = scorer.embed_answers(responses).await;
        assert!(embedded[0].embedding.is_some());
        assert!(embedded[1].embedding.is_none());
        assert!(embedded[2].embedding.is_none());
    }

    struct Stalled;

    #[async_trait]
    impl EmbeddingProvider for Stalled {
        fn model_name(&self) -> &str {
            "stalled"
        }

        async fn embed(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(EmbeddingVector::new(vec![1.0]))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_embedding_is_cut_off() {
        let scorer = EmbeddingScorer::new(Arc::new(Stalled)).with_timeout(Duration::from_secs(5));
        let started = tokio::time::Instant::now();

        let embedded = scorer
            .embed_answers(vec![ProviderResponse::answer("A", "Paris.", 0)])
            .await;
        assert!(embedded[0].embedding.is_none());
        assert_eq!(scorer.embed_text("Paris.").await, None);
        assert!(started.elapsed() < Duration::from_secs(60));

        assert_eq!(
            embed_within(&Stalled, Duration::from_secs(5), "x").await,
            Err(EmbeddingError::Timeout(Duration::from_secs(5)))
        );
    }

    #[tokio::test]
    async fn test_disabled_scorer_leaves_answers_bare() {
        let scorer = EmbeddingScorer::disabled();
        assert!(!scorer.is_enabled());
        let embedded = scorer
            .embed_answers(vec![ProviderResponse::answer("A", "Paris.", 0)])
            .await;
        assert!(embedded[0].embedding.is_none());
        assert_eq!(scorer.embed_text("Paris.").await, None);
    }
}
