//! Cohere `generate` adapter

use super::error::HttpProviderError;
use super::http::send_json;
use async_trait::async_trait;
use chorus_application::{GenerationProvider, ProviderError};
use chorus_domain::{Conversation, Language, PromptTemplate, ProviderName};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

pub struct CohereProvider {
    client: Client,
    name: ProviderName,
    model: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout: Duration,
}

impl CohereProvider {
    pub fn new(
        client: Client,
        name: ProviderName,
        model: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            name,
            model: model.into(),
            base_url: base_url.into(),
            api_key,
            api_key_env: api_key_env.into(),
            timeout,
        }
    }

    async fn generate_text(&self, prompt: String) -> Result<String, HttpProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HttpProviderError::MissingCredential(self.api_key_env.clone()))?;

        let url = format!("{}/generate", self.base_url);
        debug!(provider = %self.name, model = %self.model, "POST {}", url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let response: GenerateResponse = send_json(
            self.client
                .post(url)
                .bearer_auth(api_key)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&request),
        )
        .await?;

        extract_text(response)
    }
}

#[async_trait]
impl GenerationProvider for CohereProvider {
    fn name(&self) -> &ProviderName {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(
        &self,
        history: &Conversation,
        question: &str,
        language: &Language,
    ) -> Result<String, ProviderError> {
        let prompt = PromptTemplate::transcript(history, question, language);
        Ok(self.generate_text(prompt).await?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

fn extract_text(response: GenerateResponse) -> Result<String, HttpProviderError> {
    if let Some(message) = response.message.filter(|_| response.generations.is_empty()) {
        return Err(HttpProviderError::Api(message));
    }
    let text = response
        .generations
        .into_iter()
        .next()
        .map(|generation| generation.text)
        .ok_or_else(|| HttpProviderError::Parse("response has no generations".to_string()))?;
    if text.trim().is_empty() {
        return Err(HttpProviderError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let ok: GenerateResponse =
            serde_json::from_str(r#"{"id":"x","generations":[{"id":"g","text":" Parigi."}]}"#).unwrap();
        assert_eq!(extract_text(ok).unwrap(), " Parigi.");

        let err: GenerateResponse = serde_json::from_str(r#"{"message":"invalid api token"}"#).unwrap();
        match extract_text(err) {
            Err(HttpProviderError::Api(message)) => assert_eq!(message, "invalid api token"),
            other => panic!("unexpected: {:?}", other),
        }

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"generations":[{"text":"  "}]}"#).unwrap();
        assert!(matches!(extract_text(blank), Err(HttpProviderError::Empty)));
    }
}
