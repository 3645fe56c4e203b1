pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod testing;

pub use app::{Application, Cli, Commands};
pub use config::{AppConfig, Config, Environment, ServerConfig};
pub use database::{DatabaseConfig, DbConnection};
pub use error::FrameworkError;
pub use http::{HttpResponse, Request, Response};
pub use middleware::{Middleware, MiddlewareRegistry, Next};
pub use routing::{GroupBuilder, GroupRouter, RouteBuilder, Router};
pub use server::Server;

// Re-export for middleware implementations
pub use async_trait::async_trait;
