//! Rate limit configuration from TOML (`[rate_limit]` section)

use chorus_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_HOURLY_LIMIT, SessionKey};
use serde::{Deserialize, Serialize};

/// Raw rate limit configuration
///
/// # Example
///
/// ```toml
/// [rate_limit]
/// hourly_limit = 15
/// premium_sessions = ["d7c0c6c8-1f5e-4d1c-9d6a-2f1e0b9a4c11"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    pub hourly_limit: u32,
    /// Session keys that are never rate limited
    pub premium_sessions: Vec<String>,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            hourly_limit: DEFAULT_HOURLY_LIMIT,
            premium_sessions: Vec::new(),
        }
    }
}

impl FileRateLimitConfig {
    /// Premium keys, skipping blank entries
    pub fn premium_keys(&self) -> Vec<SessionKey> {
        self.premium_sessions
            .iter()
            .filter_map(|key| SessionKey::new(key.clone()).ok())
            .collect()
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.hourly_limit == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroLimit {
                    field: "rate_limit.hourly_limit".to_string(),
                },
                "rate_limit.hourly_limit is 0: every non-premium request will be rejected",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_keys_skip_blank() {
        let config = FileRateLimitConfig {
            hourly_limit: 15,
            premium_sessions: vec!["vip".to_string(), " ".to_string()],
        };
        assert_eq!(config.premium_keys().len(), 1);
    }

    #[test]
    fn test_zero_limit_warns() {
        let config = FileRateLimitConfig {
            hourly_limit: 0,
            premium_sessions: vec![],
        };
        assert_eq!(config.validate().len(), 1);
    }
}
