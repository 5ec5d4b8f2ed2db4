//! Cohere `embed` adapter

use crate::providers::error::HttpProviderError;
use crate::providers::http::send_json;
use async_trait::async_trait;
use chorus_application::{EmbeddingError, EmbeddingProvider};
use chorus_domain::EmbeddingVector;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct CohereEmbedder {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl CohereEmbedder {
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

        let request = EmbedRequest {
            texts: vec![text],
            model: &self.model,
            input_type: "search_document",
        };
        let response: EmbedResponse = send_json(
            self.client
                .post(format!("{}/embed", self.base_url))
                .bearer_auth(api_key)
                .json(&request),
        )
        .await?;

        first_vector(response)
    }
}

#[async_trait]
impl EmbeddingProvider for CohereEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.embed_text(text).await?)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: Vec<&'a str>,
    model: &'a str,
    input_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f64>>,
    message: Option<String>,
}

fn first_vector(response: EmbedResponse) -> Result<EmbeddingVector, HttpProviderError> {
    match response.embeddings.into_iter().next() {
        Some(vector) if !vector.is_empty() => Ok(EmbeddingVector::new(vector)),
        Some(_) => Err(HttpProviderError::Empty),
        None => Err(match response.message {
            Some(message) => HttpProviderError::Api(message),
            None => HttpProviderError::Empty,
        }),
    }
}
