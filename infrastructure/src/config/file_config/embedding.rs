//! Embedding configuration from TOML (`[embedding]` section)

use chorus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embedding backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    Cohere,
    OpenAi,
    /// No vectors: reference selection falls back to equal contributions
    Disabled,
}

impl EmbeddingKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingKind::Cohere => "embed-multilingual-v3.0",
            EmbeddingKind::OpenAi => "text-embedding-3-small",
            EmbeddingKind::Disabled => "",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            EmbeddingKind::Cohere => "https://api.cohere.ai/v1",
            EmbeddingKind::OpenAi => "https://api.openai.com/v1",
            EmbeddingKind::Disabled => "",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            EmbeddingKind::Cohere => "COHERE_API_KEY",
            EmbeddingKind::OpenAi => "OPENAI_API_KEY",
            EmbeddingKind::Disabled => "",
        }
    }
}

/// Raw embedding configuration
///
/// ```toml
/// [embedding]
/// provider = "cohere"                 # "cohere", "openai" or "disabled"
/// model = "embed-multilingual-v3.0"
/// api_key_env = "COHERE_API_KEY"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub provider: String,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "cohere".to_string(),
            model: None,
            api_key_env: None,
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl FileEmbeddingConfig {
    /// Parse `provider`, falling back to Cohere with a warning.
    pub fn parse_kind(&self) -> (EmbeddingKind, Vec<ConfigIssue>) {
        match self.provider.trim().to_lowercase().as_str() {
            "cohere" => (EmbeddingKind::Cohere, vec![]),
            "openai" => (EmbeddingKind::OpenAi, vec![]),
            "disabled" | "none" | "off" => (EmbeddingKind::Disabled, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "embedding.provider".to_string(),
                        value: self.provider.clone(),
                        valid_values: vec![
                            "cohere".to_string(),
                            "openai".to_string(),
                            "disabled".to_string(),
                        ],
                    },
                    format!(
                        "embedding.provider: unknown value '{}', falling back to 'cohere'",
                        self.provider
                    ),
                );
                (EmbeddingKind::Cohere, vec![issue])
            }
        }
    }

    pub fn model(&self, kind: EmbeddingKind) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    pub fn api_key_env(&self, kind: EmbeddingKind) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| kind.default_api_key_env().to_string())
    }

    pub fn base_url(&self, kind: EmbeddingKind) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
