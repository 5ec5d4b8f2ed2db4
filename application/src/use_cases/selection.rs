//! Selector / synthesizer
//!
//! Produces the [`AggregationResult`] from the collected, embedded
//! responses according to the configured [`SelectionPolicy`].

use crate::ports::generation::GenerationProvider;
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::use_cases::scoring::EmbeddingScorer;
use chorus_domain::{
    AggregationResult, Conversation, Language, PromptTemplate, ProviderName, ProviderResponse,
    SelectionPolicy, Turn, contributions_against, select_by_reference, valid_by_arrival,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Selector {
    policy: SelectionPolicy,
    synthesizer: Option<Arc<dyn GenerationProvider>>,
    fallback_order: Vec<ProviderName>,
    retry: RetryPolicy,
}

impl Selector {
    /// Reference-similarity selection
    pub fn reference() -> Self {
        Self {
            policy: SelectionPolicy::Reference,
            synthesizer: None,
            fallback_order: Vec::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Re-synthesis through `synthesizer`, falling back in `fallback_order`.
    ///
    /// With no synthesizer every request takes the fallback path.
    pub fn resynthesis(
        synthesizer: Option<Arc<dyn GenerationProvider>>,
        fallback_order: Vec<ProviderName>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            policy: SelectionPolicy::Resynthesis,
            synthesizer,
            fallback_order,
            retry,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub async fn select(
        &self,
        scorer: &EmbeddingScorer,
        question: &str,
        language: &Language,
        responses: &[ProviderResponse],
    ) -> AggregationResult {
        match self.policy {
            SelectionPolicy::Reference => self.select_reference(language, responses),
            SelectionPolicy::Resynthesis => {
                self.resynthesize(scorer, question, language, responses)
                    .await
            }
        }
    }

    fn select_reference(&self, language: &Language, responses: &[ProviderResponse]) -> AggregationResult {
        let Some(selection) = select_by_reference(responses) else {
            return AggregationResult::no_valid_responses(language, responses, self.policy);
        };

        info!(
            reference = %selection.reference,
            chosen = %selection.chosen,
            "Selected answer by reference similarity"
        );
        AggregationResult::new(
            selection.final_text,
            responses,
            selection.contributions,
            self.policy,
        )
        .with_reference(selection.reference)
    }

    async fn resynthesize(
        &self,
        scorer: &EmbeddingScorer,
        question: &str,
        language: &Language,
        responses: &[ProviderResponse],
    ) -> AggregationResult {
        let valid = valid_by_arrival(responses);
        if valid.is_empty() {
            return AggregationResult::no_valid_responses(language, responses, self.policy);
        }

        let answers: Vec<(ProviderName, String)> = valid
            .iter()
            .filter_map(|r| r.answer_text().map(|text| (r.provider.clone(), text.to_string())))
            .collect();

        if let Some(text) = self.call_synthesizer(question, language, &answers).await {
            let target = scorer.embed_text(&text).await;
            let contributions = contributions_against(target.as_ref(), responses);
            return AggregationResult::new(text, responses, contributions, self.policy);
        }

        let fallback = self.fallback(&valid);
        warn!(provider = %fallback.provider, "Re-synthesis failed, using a single answer");
        let target = match &fallback.embedding {
            Some(vector) => Some(vector.clone()),
            None => match fallback.answer_text() {
                Some(text) => scorer.embed_text(text).await,
                None => None,
            },
        };
        let contributions = contributions_against(target.as_ref(), responses);

        AggregationResult::new(
            fallback.answer_text().unwrap_or_default(),
            responses,
            contributions,
            self.policy,
        )
        .with_reference(fallback.provider.clone())
        .degraded()
    }

    async fn call_synthesizer(
        &self,
        question: &str,
        language: &Language,
        answers: &[(ProviderName, String)],
    ) -> Option<String> {
        let synthesizer = self.synthesizer.as_ref()?;

        let mut context = Conversation::new();
        context.push(Turn::system(PromptTemplate::synthesis_system()));
        let prompt = PromptTemplate::synthesis_prompt(question, language, answers);
        let name = synthesizer.name().as_str();

        let result = retry_with_backoff(self.retry, synthesizer.timeout(), name, |_| {
            synthesizer.generate(&context, &prompt, language)
        })
        .await;

        match result {
            Ok(text) if !text.trim().is_empty() => {
                info!(provider = name, "Synthesized final answer");
                Some(text)
            }
            Ok(_) => {
                warn!(provider = name, "Synthesizer returned an empty answer");
                None
            }
            Err(e) => {
                warn!(provider = name, "Synthesizer failed: {}", e);
                None
            }
        }
    }

    /// First valid answer in the configured priority order, else the
    /// earliest arrival. `valid` must be non-empty.
    fn fallback<'a>(&self, valid: &[&'a ProviderResponse]) -> &'a ProviderResponse {
        self.fallback_order
            .iter()
            .find_map(|name| valid.iter().find(|r| r.provider.matches(name.as_str())))
            .copied()
            .unwrap_or(valid[0])
    }
}
