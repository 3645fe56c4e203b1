//! HTTP middleware for the to-do service

mod auth;
mod logging;

pub use auth::AuthMiddleware;
pub use logging::LoggingMiddleware;
