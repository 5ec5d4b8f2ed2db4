//! Provider configuration from TOML (`[[providers]]` array)

use chorus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Wire protocol spoken by a generation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `POST {base_url}/chat/completions` (OpenAI, DeepSeek, Mistral, DeepInfra, AIML API)
    OpenAiCompatible,
    /// `POST {base_url}/models/{model}:generateContent`
    Gemini,
    /// `POST {base_url}/generate`
    Cohere,
}

impl ProviderKind {
    pub const VALID: [&'static str; 3] = ["openai_compatible", "gemini", "cohere"];

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiCompatible => "https://api.openai.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1",
            ProviderKind::Cohere => "https://api.cohere.ai/v1",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "openai_compatible" | "openai" => Ok(ProviderKind::OpenAiCompatible),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "cohere" => Ok(ProviderKind::Cohere),
            _ => Err(()),
        }
    }
}

/// One `[[providers]]` entry
///
/// # Example
///
/// ```toml
/// [[providers]]
/// name = "DeepSeek"
/// kind = "openai_compatible"
/// model = "deepseek-chat"
/// base_url = "https://api.deepseek.com/v1"
/// api_key_env = "DEEPSEEK_API_KEY"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Display name, unique across providers
    pub name: String,
    pub kind: String,
    pub model: String,
    /// Defaults to the vendor endpoint for `kind`
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: Option<u64>,
    pub enabled: bool,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: "openai_compatible".to_string(),
            model: String::new(),
            base_url: None,
            api_key_env: String::new(),
            timeout_secs: None,
            enabled: true,
        }
    }
}

impl FileProviderConfig {
    fn new(name: &str, kind: &str, model: &str, base_url: Option<&str>, api_key_env: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            model: model.to_string(),
            base_url: base_url.map(str::to_string),
            api_key_env: api_key_env.to_string(),
            ..Self::default()
        }
    }

    /// Parse `kind`, falling back to OpenAI-compatible with a warning.
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(()) => {
                let field = format!("providers.{}.kind", self.name);
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: field.clone(),
                        value: self.kind.clone(),
                        valid_values: ProviderKind::VALID.iter().map(|v| v.to_string()).collect(),
                    },
                    format!(
                        "{}: unknown value '{}', falling back to 'openai_compatible'",
                        field, self.kind
                    ),
                );
                (ProviderKind::OpenAiCompatible, vec![issue])
            }
        }
    }

    pub fn base_url(&self, kind: ProviderKind) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Providers used when the config names none
pub fn default_providers() -> Vec<FileProviderConfig> {
    vec![
        FileProviderConfig::new("OpenAI", "openai_compatible", "gpt-3.5-turbo", None, "OPENAI_API_KEY"),
        FileProviderConfig::new(
            "DeepSeek",
            "openai_compatible",
            "deepseek-chat",
            Some("https://api.deepseek.com/v1"),
            "DEEPSEEK_API_KEY",
        ),
        FileProviderConfig::new("Gemini", "gemini", "gemini-1.5-flash", None, "GEMINI_API_KEY"),
        FileProviderConfig::new(
            "Mistral",
            "openai_compatible",
            "mistral-small-latest",
            Some("https://api.mistral.ai/v1"),
            "MISTRAL_API_KEY",
        ),
        FileProviderConfig::new("Cohere", "cohere", "command", None, "COHERE_API_KEY"),
    ]
}

/// Issues across the whole provider list
pub fn validate_providers(providers: &[FileProviderConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for provider in providers.iter().filter(|p| p.enabled) {
        issues.extend(provider.parse_kind().1);
        if !seen.insert(provider.name.to_lowercase()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateProviderName {
                    name: provider.name.clone(),
                },
                format!("providers: name '{}' is used more than once", provider.name),
            ));
        }
    }

    if seen.is_empty() {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::NoEnabledProviders,
            "providers: no provider is enabled",
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let providers = default_providers();
        assert_eq!(providers.len(), 5);
        assert!(validate_providers(&providers).is_empty());
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let provider = FileProviderConfig {
            name: "Odd".to_string(),
            kind: "smoke-signals".to_string(),
            ..FileProviderConfig::default()
        };
        let (kind, issues) = provider.parse_kind();
        assert_eq!(kind, ProviderKind::OpenAiCompatible);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_duplicate_names_are_errors() {
        let mut providers = default_providers();
        providers.push(FileProviderConfig {
            name: "openai".to_string(),
            ..FileProviderConfig::default()
        });
        let issues = validate_providers(&providers);
        assert!(issues.iter().any(|i| matches!(
            i.code,
            ConfigIssueCode::DuplicateProviderName { .. }
        )));
    }

    #[test]
    fn test_all_disabled() {
        let providers: Vec<_> = default_providers()
            .into_iter()
            .map(|p| FileProviderConfig { enabled: false, ..p })
            .collect();
        let issues = validate_providers(&providers);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::NoEnabledProviders);
    }

    #[test]
    fn test_base_url_defaults_by_kind() {
        let provider = FileProviderConfig {
            base_url: Some("https://api.deepinfra.com/v1/openai/".to_string()),
            ..FileProviderConfig::default()
        };
        assert_eq!(
            provider.base_url(ProviderKind::OpenAiCompatible),
            "https://api.deepinfra.com/v1/openai"
        );
        assert_eq!(
            FileProviderConfig::default().base_url(ProviderKind::Gemini),
            "https://generativelanguage.googleapis.com/v1"
        );
    }
}
