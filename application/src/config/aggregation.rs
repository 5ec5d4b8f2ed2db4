//! Aggregation parameters - how one request is admitted, retried and reconciled.

use crate::retry::RetryPolicy;
use chorus_domain::{DEFAULT_HOURLY_LIMIT, Language, ProviderName, SelectionPolicy};

/// Runtime parameters of [`AskUseCase`](crate::use_cases::ask::AskUseCase).
///
/// Built by the infrastructure config loader; the defaults match a bare
/// install without any config file.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationConfig {
    /// Requests a non-premium session may make per hour.
    pub hourly_limit: u32,
    pub retry: RetryPolicy,
    pub policy: SelectionPolicy,
    /// Provider asked to merge answers under [`SelectionPolicy::Resynthesis`].
    pub synthesis_provider: Option<ProviderName>,
    /// Priority order for the degraded fallback when re-synthesis fails.
    pub fallback_order: Vec<ProviderName>,
    /// Language used when a request does not name one.
    pub default_language: Language,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            hourly_limit: DEFAULT_HOURLY_LIMIT,
            retry: RetryPolicy::default(),
            policy: SelectionPolicy::default(),
            synthesis_provider: Some(ProviderName::new("OpenAI")),
            fallback_order: Vec::new(),
            default_language: Language::default(),
        }
    }
}

impl AggregationConfig {
    // ==================== Builder Methods ====================

    pub fn with_hourly_limit(mut self, limit: u32) -> Self {
        self.hourly_limit = limit;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_synthesis_provider(mut self, provider: Option<ProviderName>) -> Self {
        self.synthesis_provider = provider;
        self
    }

    pub fn with_fallback_order(mut self, order: Vec<ProviderName>) -> Self {
        self.fallback_order = order;
        self
    }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }
}
