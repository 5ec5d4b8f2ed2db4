//! OpenAI `embeddings` adapter

use crate::providers::error::HttpProviderError;
use crate::providers::http::send_json;
use async_trait::async_trait;
use chorus_application::{EmbeddingError, EmbeddingProvider};
use chorus_domain::EmbeddingVector;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OpenAiEmbedder {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl OpenAiEmbedder {
    pub fn new(
        client: Client,
        model: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            base_url: base_url.into(),
            api_key,
            api_key_env: api_key_env.into(),
        }
    }

    async fn embed_text(&self, text: &str) -> Result<EmbeddingVector, HttpProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HttpProviderError::MissingCredential(self.api_key_env.clone()))?;

        let response: EmbeddingsResponse = send_json(
            self.client
                .post(format!("{}/embeddings", self.base_url))
                .bearer_auth(api_key)
                .json(&EmbeddingsRequest {
                    input: text,
                    model: &self.model,
                }),
        )
        .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|vector| !vector.is_empty())
            .map(EmbeddingVector::new)
            .ok_or(HttpProviderError::Empty)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.embed_text(text).await?)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f64>,
}
