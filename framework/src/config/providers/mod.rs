mod app;
mod server;

pub use app::{AppConfig, AppConfigBuilder};
pub use server::{ServerConfig, ServerConfigBuilder};
