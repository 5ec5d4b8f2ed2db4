//! Gemini `generateContent` adapter
//!
//! The conversation is flattened into a single `role: text` transcript, the
//! way Gemini's v1 endpoint is fed a one-shot prompt.

use super::error::HttpProviderError;
use super::http::send_json;
use async_trait::async_trait;
use chorus_application::{GenerationProvider, ProviderError};
use chorus_domain::{Conversation, Language, PromptTemplate, ProviderName};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct GeminiProvider {
    client: Client,
    name: ProviderName,
    model: String,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout: Duration,
}

impl GeminiProvider {
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

    async fn generate_content(&self, transcript: String) -> Result<String, HttpProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HttpProviderError::MissingCredential(self.api_key_env.clone()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(provider = %self.name, model = %self.model, "POST {}", url);

        let response: GenerateContentResponse = send_json(
            self.client
                .post(url)
                .query(&[("key", api_key)])
                .json(&GenerateContentRequest::from_text(transcript)),
        )
        .await?;

        extract_text(response)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
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
        let transcript = PromptTemplate::transcript(history, question, language);
        Ok(self.generate_content(transcript).await?)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_text(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(text) }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, HttpProviderError> {
    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| HttpProviderError::Parse("Gemini returned no candidates".to_string()))?;
    if text.trim().is_empty() {
        return Err(HttpProviderError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_text(
            "user: Respond in English: Hi\n".to_string(),
        ))
        .unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "user: Respond in English: Hi\n"
        );
    }

    #[test]
    fn test_extract_text() {
        let ok: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Paris."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(ok).unwrap(), "Paris.");

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(extract_text(blocked), Err(HttpProviderError::Parse(_))));
    }
}
