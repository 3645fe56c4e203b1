//! Configuration loaded from `.env` files and the process environment
//!
//! # Example
//!
//! ```rust,no_run
//! use kit::config::{Config, ServerConfig};
//!
//! let env = Config::init(std::path::Path::new("."));
//! let server = ServerConfig::from_env();
//! println!("{} on port {}", env, server.port);
//! ```

pub mod env;
pub mod providers;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{AppConfig, AppConfigBuilder, ServerConfig, ServerConfigBuilder};

use std::path::Path;

pub struct Config;

impl Config {
    /// Load `.env` files from `project_root` and return the detected environment
    ///
    /// Call once at startup, before reading any config struct.
    pub fn init(project_root: &Path) -> Environment {
        env::load_dotenv(project_root)
    }
}
