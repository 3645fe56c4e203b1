//! Route grouping with shared prefix and middleware

use super::router::{box_handler, BoxedHandler, Method};
use super::{RouteBuilder, Router};
use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use std::future::Future;
use std::sync::Arc;

/// Builder for route groups with shared prefix and middleware
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .group("/api/todo", |r| {
///         r.get("", list).get("/{id}", show).name("todo.show")
///     })
///     .middleware(AuthMiddleware::new(tokens))
///     .into_router()
/// ```
pub struct GroupBuilder {
    outer_router: Router,
    group_routes: Vec<GroupRoute>,
    prefix: String,
    middleware: Vec<BoxedMiddleware>,
}

struct GroupRoute {
    method: Method,
    path: String,
    handler: Arc<BoxedHandler>,
    name: Option<String>,
}

impl GroupBuilder {
    /// Apply middleware to all routes in this group
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(into_boxed(middleware));
        self
    }

    /// Merge the group's routes into the outer router with the prefix applied
    pub fn into_router(mut self) -> Router {
        for route in self.group_routes {
            let full_path = format!("{}{}", self.prefix, route.path);
            let inserted = self.outer_router.insert(
                route.method,
                &full_path,
                route.handler,
                self.middleware.clone(),
            );

            if let (Some(_), Some(name)) = (inserted, route.name) {
                self.outer_router.add_name(&name, &full_path);
            }
        }

        self.outer_router
    }
}

impl From<GroupBuilder> for Router {
    fn from(builder: GroupBuilder) -> Self {
        builder.into_router()
    }
}

/// Inner router used within a group closure
///
/// Captures routes relative to the group prefix.
pub struct GroupRouter {
    routes: Vec<GroupRoute>,
}

impl GroupRouter {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn push<H, Fut>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            handler: box_handler(handler),
            name: None,
        });
        self
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Get, path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Post, path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Put, path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Delete, path, handler)
    }

    /// Name the most recently added route
    pub fn name(mut self, name: &str) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.name = Some(name.to_string());
        }
        self
    }
}

impl Router {
    /// Create a route group with a shared prefix
    ///
    /// Middleware applied to the group is applied to every route in it.
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        let built = builder_fn(GroupRouter::new());

        GroupBuilder {
            outer_router: self,
            group_routes: built.routes,
            prefix: prefix.trim_end_matches('/').to_string(),
            middleware: Vec::new(),
        }
    }
}

impl RouteBuilder {
    /// Create a route group with a shared prefix
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        self.router.group(prefix, builder_fn)
    }
}
