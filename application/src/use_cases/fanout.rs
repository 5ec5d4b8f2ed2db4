//! Provider fanout
//!
//! Dispatches one question to every provider as independent tasks. Each
//! task reports exactly one [`ProviderOutcome`] on a shared channel.

use crate::ports::generation::GenerationProvider;
use crate::retry::{RetryPolicy, retry_with_backoff};
use chorus_domain::{Conversation, Language, ProviderName, ProviderOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One provider's report on the completion channel
pub type Completion = (ProviderName, ProviderOutcome);

/// In-flight fanout
///
/// Owns the provider tasks: dropping it aborts every call still running.
pub struct Dispatch {
    pub(crate) tasks: JoinSet<()>,
    pub(crate) completions: mpsc::UnboundedReceiver<Completion>,
    pub(crate) dispatched: Vec<ProviderName>,
    pub(crate) context_only: Vec<ProviderName>,
}

impl Dispatch {
    /// Providers the question was sent to, in configuration order
    pub fn dispatched(&self) -> &[ProviderName] {
        &self.dispatched
    }

    pub fn is_context_only(&self, provider: &ProviderName) -> bool {
        self.context_only.contains(provider)
    }
}

/// Sends a question to every configured provider concurrently
pub struct Fanout {
    providers: Vec<Arc<dyn GenerationProvider>>,
    retry: RetryPolicy,
}

impl Fanout {
    pub fn new(providers: Vec<Arc<dyn GenerationProvider>>, retry: RetryPolicy) -> Self {
        Self { providers, retry }
    }

    pub fn providers(&self) -> &[Arc<dyn GenerationProvider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Look up a scored provider by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.providers
            .iter()
            .find(|p| p.scored() && p.name().matches(name))
            .cloned()
    }

    /// Spawn one task per provider.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, history: &Conversation, question: &str, language: &Language) -> Dispatch {
        info!("Dispatching question to {} providers", self.providers.len());

        let (sender, completions) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();
        let mut dispatched = Vec::with_capacity(self.providers.len());
        let mut context_only = Vec::new();

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let sender = sender.clone();
            let history = history.clone();
            let question = question.to_string();
            let language = language.clone();
            let retry = self.retry;
            dispatched.push(provider.name().clone());
            if !provider.scored() {
                context_only.push(provider.name().clone());
            }

            tasks.spawn(async move {
                let outcome = Self::ask_provider(&*provider, retry, &history, &question, &language).await;
                // The receiver is gone only if the request itself was dropped.
                let _ = sender.send((provider.name().clone(), outcome));
            });
        }

        Dispatch {
            tasks,
            completions,
            dispatched,
            context_only,
        }
    }

    async fn ask_provider(
        provider: &dyn GenerationProvider,
        retry: RetryPolicy,
        history: &Conversation,
        question: &str,
        language: &Language,
    ) -> ProviderOutcome {
        let name = provider.name().as_str();
        let started = Instant::now();

        let result = retry_with_backoff(retry, provider.timeout(), name, |attempt| {
            debug!(provider = name, attempt, "Sending request");
            provider.generate(history, question, language)
        })
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(text) if !text.trim().is_empty() => {
                info!(provider = name, elapsed_ms, "Provider answered");
                ProviderOutcome::Answer(text)
            }
            Ok(_) => {
                warn!(provider = name, elapsed_ms, "Provider returned an empty answer");
                ProviderOutcome::Failed("empty response".to_string())
            }
            Err(e) => {
                warn!(provider = name, elapsed_ms, "Provider failed: {}", e);
                ProviderOutcome::Failed(e.to_string())
            }
        }
    }
}
