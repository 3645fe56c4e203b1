//! Middleware: code that wraps a handler and may short-circuit it
//!
//! Global middleware is added on the `Server`; route middleware is attached to
//! a single route or a whole group on the `Router`. At dispatch the chain runs
//! global middleware first, then route middleware, then the handler.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::{async_trait, Middleware, Next, Request, Response};
//!
//! pub struct RequireJson;
//!
//! #[async_trait]
//! impl Middleware for RequireJson {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         if request.content_type() != Some("application/json") {
//!             return Err(HttpResponse::empty(415));
//!         }
//!         next.run(request).await
//!     }
//! }
//! ```

mod registry;

pub use registry::MiddlewareRegistry;

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by handlers and continuations
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handle the request, calling `next.run(request)` to continue the chain
    async fn handle(&self, request: Request, next: Next) -> Response;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// The rest of the chain after the current middleware
#[derive(Clone)]
pub struct Next {
    inner: Arc<dyn Fn(Request) -> BoxFuture<Response> + Send + Sync>,
}

impl Next {
    fn new<F>(f: F) -> Self
    where
        F: Fn(Request) -> BoxFuture<Response> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    pub async fn run(self, request: Request) -> Response {
        (self.inner)(request).await
    }
}

/// Ordered middleware for one request
#[derive(Default)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    /// Run the chain with `handler` as the innermost step
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        let mut next = Next::new(move |req| handler(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next;
            next = Next::new(move |req| {
                let middleware = middleware.clone();
                let inner = inner.clone();
                Box::pin(async move { middleware.handle(req, inner).await })
            });
        }

        next.run(request).await
    }
}
