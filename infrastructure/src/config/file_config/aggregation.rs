//! Aggregation configuration from TOML (`[aggregation]` section)

use chorus_domain::{ConfigIssue, ConfigIssueCode, Language, ProviderName, SelectionPolicy};
use serde::{Deserialize, Serialize};

/// Raw aggregation configuration
///
/// # Example
///
/// ```toml
/// [aggregation]
/// policy = "resynthesis"                 # "reference" or "resynthesis"
/// synthesis_provider = "OpenAI"
/// fallback_order = ["OpenAI", "Gemini", "DeepSeek"]
/// default_language = "English"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAggregationConfig {
    pub policy: String,
    pub synthesis_provider: Option<String>,
    pub fallback_order: Vec<String>,
    pub default_language: String,
}

impl Default for FileAggregationConfig {
    fn default() -> Self {
        Self {
            policy: "reference".to_string(),
            synthesis_provider: Some("OpenAI".to_string()),
            fallback_order: Vec::new(),
            default_language: Language::default().to_string(),
        }
    }
}

impl FileAggregationConfig {
    /// Parse `policy`, falling back to reference selection with a warning.
    pub fn parse_policy(&self) -> (SelectionPolicy, Vec<ConfigIssue>) {
        match self.policy.parse::<SelectionPolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "aggregation.policy".to_string(),
                        value: self.policy.clone(),
                        valid_values: vec!["reference".to_string(), "resynthesis".to_string()],
                    },
                    format!(
                        "aggregation.policy: unknown value '{}', falling back to 'reference'",
                        self.policy
                    ),
                );
                (SelectionPolicy::default(), vec![issue])
            }
        }
    }

    pub fn default_language(&self) -> Language {
        self.default_language.parse().unwrap_or_default()
    }

    pub fn synthesis_provider(&self) -> Option<ProviderName> {
        self.synthesis_provider
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ProviderName::new)
    }

    pub fn fallback_order(&self) -> Vec<ProviderName> {
        self.fallback_order
            .iter()
            .map(|name| ProviderName::new(name.trim()))
            .collect()
    }

    /// The synthesis provider must be one of `enabled` under re-synthesis.
    pub fn validate_against(&self, enabled: &[&str]) -> Vec<ConfigIssue> {
        let (policy, mut issues) = self.parse_policy();
        if policy != SelectionPolicy::Resynthesis {
            return issues;
        }

        let known = |name: &str| enabled.iter().any(|e| e.eq_ignore_ascii_case(name));
        match self.synthesis_provider() {
            Some(name) if known(name.as_str()) => {}
            Some(name) => issues.push(ConfigIssue::warning(
                ConfigIssueCode::SynthesisProviderMissing {
                    name: name.to_string(),
                },
                format!(
                    "aggregation.synthesis_provider: '{}' is not an enabled provider, answers will use the fallback order",
                    name
                ),
            )),
            None => issues.push(ConfigIssue::warning(
                ConfigIssueCode::SynthesisProviderMissing {
                    name: String::new(),
                },
                "aggregation.synthesis_provider is not set, answers will use the fallback order",
            )),
        }
        issues
    }
}
