//! OpenAI-compatible chat completions adapter
//!
//! Speaks `POST {base_url}/chat/completions` with bearer authentication.
//! OpenAI, DeepSeek, Mistral, DeepInfra and AIML API all accept this shape.

use super::error::HttpProviderError;
use super::http::send_json;
use async_trait::async_trait;
use chorus_application::{GenerationProvider, ProviderError};
use chorus_domain::{Conversation, Language, PromptTemplate, ProviderName, Turn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

pub struct OpenAiCompatibleProvider {
    client: Client,
    name: ProviderName,
    model: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
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

    fn build_request(&self, turns: &[Turn]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: turns
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role.as_str().to_string(),
                    content: turn.text.clone(),
                })
                .collect(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, HttpProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HttpProviderError::MissingCredential(self.api_key_env.clone()))?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.name, model = %self.model, "POST {}", url);

        let response: ChatResponse = send_json(
            self.client
                .post(url)
                .bearer_auth(api_key)
                .json(&self.build_request(turns)),
        )
        .await?;

        extract_text(response)
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompatibleProvider {
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
        let turns = PromptTemplate::annotated_turns(history, question, language);
        Ok(self.complete(&turns).await?)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn extract_text(response: ChatResponse) -> Result<String, HttpProviderError> {
    if let Some(error) = response.error {
        return Err(HttpProviderError::Api(error.message));
    }
    let text = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| HttpProviderError::Parse("response has no choices".to_string()))?;
    if text.trim().is_empty() {
        return Err(HttpProviderError::Empty);
    }
    Ok(text)
}
