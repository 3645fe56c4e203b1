//! Registry for global middleware
//!
//! Populated through `Server::middleware()` at startup.

use super::{into_boxed, BoxedMiddleware, Middleware};

/// Middleware that runs on every request, in registration order
#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    global: Vec<BoxedMiddleware>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append global middleware
    ///
    /// Global middleware runs before any route-specific middleware.
    pub fn append<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.global.push(into_boxed(middleware));
        self
    }

    pub fn global_middleware(&self) -> &[BoxedMiddleware] {
        &self.global
    }
}
