//! Builds the provider and embedding adapters named in the configuration.

use super::cohere::CohereProvider;
use super::gemini::GeminiProvider;
use super::http::api_key_from_env;
use super::news::NewsContextProvider;
use super::openai_compatible::OpenAiCompatibleProvider;
use crate::config::{
    EmbeddingKind, FileConfig, FileEmbeddingConfig, FileNewsConfig, FileProviderConfig, ProviderKind,
};
use crate::embedding::{CohereEmbedder, OpenAiEmbedder};
use chorus_application::{DEFAULT_PROVIDER_TIMEOUT, EmbeddingScorer, GenerationProvider};
use chorus_domain::ProviderName;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// Every enabled generation provider, in configuration order.
///
/// Providers without an API key are still built: each request reports them
/// as failed instead of dropping them from the fanout. An enabled `[news]`
/// section adds the news participant last.
pub fn build_providers(config: &FileConfig, client: &Client) -> Vec<Arc<dyn GenerationProvider>> {
    let mut providers: Vec<Arc<dyn GenerationProvider>> = config
        .enabled_providers()
        .map(|provider| build_provider(provider, client))
        .collect();
    if config.news.enabled {
        providers.push(build_news(&config.news, client));
    }
    providers
}

fn build_news(config: &FileNewsConfig, client: &Client) -> Arc<dyn GenerationProvider> {
    let name = ProviderName::new(config.name.clone());
    let api_key = api_key_from_env(&config.api_key_env);
    if api_key.is_none() {
        warn!(provider = %name, "{} is not set, news context will report an error", config.api_key_env);
    }
    info!(provider = %name, page_size = config.page_size, "Configured news context");

    Arc::new(NewsContextProvider::new(
        client.clone(),
        name,
        config.base_url.clone(),
        api_key,
        config.api_key_env.clone(),
        config.page_size,
        config.timeout(),
    ))
}

fn build_provider(config: &FileProviderConfig, client: &Client) -> Arc<dyn GenerationProvider> {
    let (kind, _) = config.parse_kind();
    let name = ProviderName::new(config.name.clone());
    let base_url = config.base_url(kind);
    let timeout = config.timeout().unwrap_or(DEFAULT_PROVIDER_TIMEOUT);
    let api_key = api_key_from_env(&config.api_key_env);

    if api_key.is_none() {
        warn!(provider = %name, "{} is not set, provider will report an error", config.api_key_env);
    }
    info!(provider = %name, model = %config.model, ?kind, "Configured provider");

    match kind {
        ProviderKind::OpenAiCompatible => Arc::new(OpenAiCompatibleProvider::new(
            client.clone(),
            name,
            config.model.clone(),
            base_url,
            api_key,
            config.api_key_env.clone(),
            timeout,
        )),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            client.clone(),
            name,
            config.model.clone(),
            base_url,
            api_key,
            config.api_key_env.clone(),
            timeout,
        )),
        ProviderKind::Cohere => Arc::new(CohereProvider::new(
            client.clone(),
            name,
            config.model.clone(),
            base_url,
            api_key,
            config.api_key_env.clone(),
            timeout,
        )),
    }
}

/// Embedding scorer for the configured backend; disabled scorers never embed.
pub fn build_scorer(config: &FileEmbeddingConfig, client: &Client) -> EmbeddingScorer {
    let (kind, _) = config.parse_kind();
    let model = config.model(kind);
    let base_url = config.base_url(kind);
    let api_key_env = config.api_key_env(kind);
    let api_key = api_key_from_env(&api_key_env);

    let scorer = match kind {
        EmbeddingKind::Disabled => {
            info!("Embeddings disabled, no contributions will be reported");
            return EmbeddingScorer::disabled();
        }
        EmbeddingKind::Cohere => EmbeddingScorer::new(Arc::new(CohereEmbedder::new(
            client.clone(),
            model,
            base_url,
            api_key,
            api_key_env,
        ))),
        EmbeddingKind::OpenAi => EmbeddingScorer::new(Arc::new(OpenAiEmbedder::new(
            client.clone(),
            model,
            base_url,
            api_key,
            api_key_env,
        ))),
    };
    scorer.with_timeout(config.timeout())
}
