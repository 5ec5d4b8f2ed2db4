//! News context configuration from TOML (`[news]` section)

use chorus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw news context configuration
///
/// The news participant runs alongside the providers but only contributes
/// context; it is never scored.
///
/// # Example
///
/// ```toml
/// [news]
/// enabled = true
/// name = "NewsAPI"
/// api_key_env = "NEWS_API_KEY"
/// page_size = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNewsConfig {
    pub enabled: bool,
    pub name: String,
    pub base_url: String,
    pub api_key_env: String,
    /// Number of articles requested
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for FileNewsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "NewsAPI".to_string(),
            base_url: "https://newsapi.org/v2".to_string(),
            api_key_env: "NEWS_API_KEY".to_string(),
            page_size: 3,
            timeout_secs: 30,
        }
    }
}

impl FileNewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the section against the enabled provider names.
    pub fn validate_against(&self, enabled_providers: &[&str]) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !self.enabled {
            return issues;
        }
        if enabled_providers
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&self.name))
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateProviderName {
                    name: self.name.clone(),
                },
                format!("news.name '{}' is already used by a provider", self.name),
            ));
        }
        if self.page_size == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroLimit {
                    field: "news.page_size".to_string(),
                },
                "news.page_size is 0: the news lookup will never return articles",
            ));
        }
        issues
    }
}
