//! NewsAPI `everything` adapter
//!
//! A context-only participant: it looks up recent articles for the question
//! and reports a headline list. Its output is shown with the raw responses
//! but never scored.

use super::error::HttpProviderError;
use super::http::send_json;
use async_trait::async_trait;
use chorus_application::{GenerationProvider, ProviderError};
use chorus_domain::{Conversation, Language, ProviderName};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, warn};

pub const NO_NEWS: &str = "No recent news found for the query.";

pub struct NewsContextProvider {
    client: Client,
    name: ProviderName,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    page_size: u32,
    timeout: Duration,
}

impl NewsContextProvider {
    pub fn new(
        client: Client,
        name: ProviderName,
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            name,
            base_url: base_url.into(),
            api_key,
            api_key_env: api_key_env.into(),
            page_size,
            timeout,
        }
    }

    async fn search(&self, query: &str, news_language: &str) -> Result<String, HttpProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| HttpProviderError::MissingCredential(self.api_key_env.clone()))?;

        let url = format!("{}/everything", self.base_url);
        debug!(provider = %self.name, language = news_language, "GET {}", url);

        let page_size = self.page_size.to_string();
        let response: NewsResponse = send_json(
            self.client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .query(&[
                    ("q", query),
                    ("sortBy", "relevancy"),
                    ("language", news_language),
                    ("pageSize", page_size.as_str()),
                    ("apiKey", api_key),
                ]),
        )
        .await?;

        format_articles(response)
    }
}

/// NewsAPI language code for a request language.
fn news_language(language: &Language) -> &'static str {
    match language {
        Language::Italian => "it",
        _ => "en",
    }
}

#[async_trait]
impl GenerationProvider for NewsContextProvider {
    fn name(&self) -> &ProviderName {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn scored(&self) -> bool {
        false
    }

    async fn generate(
        &self,
        _history: &Conversation,
        question: &str,
        language: &Language,
    ) -> Result<String, ProviderError> {
        let code = news_language(language);
        match self.search(question, code).await {
            // An unreachable Italian search gets one English try
            Err(HttpProviderError::Request(e)) if code != "en" => {
                warn!(provider = %self.name, "Italian news search failed, retrying in English: {}", e);
                Ok(self.search(question, "en").await?)
            }
            other => Ok(other?),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    title: String,
    description: Option<String>,
    #[serde(default)]
    published_at: String,
}

fn format_articles(response: NewsResponse) -> Result<String, HttpProviderError> {
    if response.status != "ok" {
        return Err(HttpProviderError::Api(
            response.message.unwrap_or_else(|| response.status.clone()),
        ));
    }
    if response.articles.is_empty() {
        return Ok(NO_NEWS.to_string());
    }

    let mut text = String::from("Recent News Context:\n");
    for (i, article) in response.articles.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, article.title);
        let _ = writeln!(text, "Published {}", article.published_at);
        if let Some(description) = article.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(text, "{}", description);
        }
    }
    Ok(text)
}
