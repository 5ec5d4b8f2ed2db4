//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod aggregation;
mod embedding;
mod logging;
mod news;
mod output;
mod providers;
mod rate_limit;
mod retry;
mod server;

pub use aggregation::FileAggregationConfig;
pub use embedding::{EmbeddingKind, FileEmbeddingConfig};
pub use logging::FileLoggingConfig;
pub use news::FileNewsConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, ProviderKind, default_providers, validate_providers};
pub use rate_limit::FileRateLimitConfig;
pub use retry::FileRetryConfig;
pub use server::FileServerConfig;

use chorus_application::AggregationConfig;
use chorus_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub rate_limit: FileRateLimitConfig,
    pub aggregation: FileAggregationConfig,
    pub retry: FileRetryConfig,
    pub embedding: FileEmbeddingConfig,
    /// Generation providers, in priority order
    pub providers: Vec<FileProviderConfig>,
    /// Optional context-only news participant
    pub news: FileNewsConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            server: FileServerConfig::default(),
            rate_limit: FileRateLimitConfig::default(),
            aggregation: FileAggregationConfig::default(),
            retry: FileRetryConfig::default(),
            embedding: FileEmbeddingConfig::default(),
            providers: default_providers(),
            news: FileNewsConfig::default(),
            output: FileOutputConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Warnings mean a default replaces the configured value; errors mean
    /// the service cannot answer anything with this configuration.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(validate_providers(&self.providers));

        let enabled: Vec<&str> = self.enabled_providers().map(|p| p.name.as_str()).collect();
        issues.extend(self.aggregation.validate_against(&enabled));
        issues.extend(self.news.validate_against(&enabled));

        issues.extend(self.embedding.parse_kind().1);
        issues.extend(self.retry.to_policy().1);
        issues.extend(self.rate_limit.validate());

        issues
    }

    pub fn enabled_providers(&self) -> impl Iterator<Item = &FileProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Runtime parameters for the ask use case.
    pub fn aggregation_config(&self) -> AggregationConfig {
        let (policy, _) = self.aggregation.parse_policy();
        let (retry, _) = self.retry.to_policy();

        let fallback_order = if self.aggregation.fallback_order.is_empty() {
            // Priority follows the provider list
            self.enabled_providers()
                .map(|p| chorus_domain::ProviderName::new(p.name.clone()))
                .collect()
        } else {
            self.aggregation.fallback_order()
        };

        AggregationConfig::default()
            .with_hourly_limit(self.rate_limit.hourly_limit)
            .with_retry(retry)
            .with_policy(policy)
            .with_synthesis_provider(self.aggregation.synthesis_provider())
            .with_fallback_order(fallback_order)
            .with_default_language(self.aggregation.default_language())
    }
}
