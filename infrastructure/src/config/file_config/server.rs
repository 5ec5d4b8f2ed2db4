//! HTTP server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// Raw server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:8080"
/// port = 9000            # overrides the port in `bind`
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
    pub port: Option<u16>,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            port: None,
        }
    }
}

impl FileServerConfig {
    /// Address to listen on, with `port` replacing the one in `bind`.
    pub fn address(&self) -> String {
        match self.port {
            Some(port) => {
                let host = self
                    .bind
                    .rsplit_once(':')
                    .map(|(host, _)| host)
                    .unwrap_or(self.bind.as_str());
                format!("{}:{}", host, port)
            }
            None => self.bind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        assert_eq!(FileServerConfig::default().address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_port_override() {
        let config = FileServerConfig {
            bind: "127.0.0.1:8080".to_string(),
            port: Some(9000),
        };
        assert_eq!(config.address(), "127.0.0.1:9000");

        let bare = FileServerConfig {
            bind: "localhost".to_string(),
            port: Some(3000),
        };
        assert_eq!(bare.address(), "localhost:3000");
    }
}
