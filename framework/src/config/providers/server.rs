use crate::config::env::env;

const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Listener settings
///
/// ```env
/// SERVER_HOST=127.0.0.1
/// SERVER_PORT=8080
/// SERVER_MAX_BODY_SIZE=10485760
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub max_body_size: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env("SERVER_HOST", "127.0.0.1".to_string()),
            port: env("SERVER_PORT", 8080),
            max_body_size: env("SERVER_MAX_BODY_SIZE", DEFAULT_MAX_BODY_SIZE),
        }
    }

    /// Start from the environment and override selected fields
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::from_env(),
        }
    }

    /// `host:port` as passed to the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .host("0.0.0.0")
            .port(9999)
            .max_body_size(1024)
            .build();

        assert_eq!(
            config,
            ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9999,
                max_body_size: 1024,
            }
        );
        assert_eq!(config.bind_address(), "0.0.0.0:9999");
    }
}
