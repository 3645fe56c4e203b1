use crate::config::env::{env, Environment};

/// Process-wide identity and mode
///
/// ```env
/// APP_NAME="Todo API"
/// APP_ENV=local
/// APP_DEBUG=false
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    /// Verbose logging unless `LOG_LEVEL`/`RUST_LOG` say otherwise
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            name: env("APP_NAME", "Todo API".to_string()),
            environment: Environment::detect(),
            debug: env("APP_DEBUG", false),
        }
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder {
            config: Self::from_env(),
        }
    }

    /// Log filter to fall back on when none is configured
    pub fn default_log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_selects_log_level() {
        let app = AppConfig::builder().debug(true).build();
        assert_eq!(app.default_log_level(), "debug");

        let app = AppConfig::builder()
            .name("todo")
            .environment(Environment::Production)
            .debug(false)
            .build();
        assert_eq!(app.default_log_level(), "info");
        assert!(app.environment.is_production());
    }
}
