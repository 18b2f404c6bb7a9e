//! HTTP server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// Raw server configuration
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
/// body_limit_bytes = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl FileServerConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = FileServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
