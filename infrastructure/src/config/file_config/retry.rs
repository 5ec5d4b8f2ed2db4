//! Retry configuration from TOML (`[retry]` section)

use chorus_application::RetryPolicy;
use chorus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry configuration, applied to every provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` waits `n × base_delay_ms`
    pub base_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let max_attempts = if self.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroLimit {
                    field: "retry.max_attempts".to_string(),
                },
                "retry.max_attempts is 0, using a single attempt",
            ));
            1
        } else {
            self.max_attempts
        };
        (
            RetryPolicy::new(max_attempts, Duration::from_millis(self.base_delay_ms)),
            issues,
        )
    }
}
