use super::RouteNames;
use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxFuture, BoxedMiddleware, Middleware};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Type alias for route handlers
pub type BoxedHandler = Box<dyn Fn(Request) -> BoxFuture<Response> + Send + Sync>;

pub(crate) fn box_handler<H, Fut>(handler: H) -> Arc<BoxedHandler>
where
    H: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let boxed: BoxedHandler = Box::new(move |req| -> BoxFuture<Response> { Box::pin(handler(req)) });
    Arc::new(boxed)
}

/// HTTP methods the router dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::GET => Some(Self::Get),
            http::Method::POST => Some(Self::Post),
            http::Method::PUT => Some(Self::Put),
            http::Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];
}

struct Route {
    handler: Arc<BoxedHandler>,
    middleware: Vec<BoxedMiddleware>,
}

/// Outcome of matching a request against the route table
pub enum RouteMatch {
    Found {
        handler: Arc<BoxedHandler>,
        middleware: Vec<BoxedMiddleware>,
        params: HashMap<String, String>,
    },
    /// The path exists but not for this method
    MethodNotAllowed,
    NotFound,
}

/// HTTP router: an explicit (method, path pattern) -> handler table
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new()
///     .get("/todo", list)
///     .get("/todo/{id}", show).name("todo.show")
///     .post("/todo", store).middleware(AuthMiddleware::new(tokens))
///     .into_router()
///     .with_state(todo_store);
/// ```
pub struct Router {
    routes: Vec<Route>,
    get_routes: MatchitRouter<usize>,
    post_routes: MatchitRouter<usize>,
    put_routes: MatchitRouter<usize>,
    delete_routes: MatchitRouter<usize>,
    names: Arc<RouteNames>,
    state: http::Extensions,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            get_routes: MatchitRouter::new(),
            post_routes: MatchitRouter::new(),
            put_routes: MatchitRouter::new(),
            delete_routes: MatchitRouter::new(),
            names: Arc::new(RouteNames::default()),
            state: http::Extensions::new(),
        }
    }

    fn table(&self, method: Method) -> &MatchitRouter<usize> {
        match method {
            Method::Get => &self.get_routes,
            Method::Post => &self.post_routes,
            Method::Put => &self.put_routes,
            Method::Delete => &self.delete_routes,
        }
    }

    fn table_mut(&mut self, method: Method) -> &mut MatchitRouter<usize> {
        match method {
            Method::Get => &mut self.get_routes,
            Method::Post => &mut self.post_routes,
            Method::Put => &mut self.put_routes,
            Method::Delete => &mut self.delete_routes,
        }
    }

    /// Insert a route with a pre-boxed handler, returning its index
    ///
    /// A pattern that conflicts with an existing route is skipped and logged.
    pub(crate) fn insert(
        &mut self,
        method: Method,
        path: &str,
        handler: Arc<BoxedHandler>,
        middleware: Vec<BoxedMiddleware>,
    ) -> Option<usize> {
        let index = self.routes.len();
        match self.table_mut(method).insert(path, index) {
            Ok(()) => {
                self.routes.push(Route {
                    handler,
                    middleware,
                });
                Some(index)
            }
            Err(e) => {
                tracing::warn!(?method, path, error = %e, "route not registered");
                None
            }
        }
    }

    pub(crate) fn add_middleware(&mut self, index: usize, middleware: BoxedMiddleware) {
        if let Some(route) = self.routes.get_mut(index) {
            route.middleware.push(middleware);
        }
    }

    pub(crate) fn add_name(&mut self, name: &str, path: &str) {
        Arc::make_mut(&mut self.names).insert(name, path);
    }

    fn route<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let last = self.insert(method, path, box_handler(handler), Vec::new());
        RouteBuilder {
            router: self,
            last,
            last_path: path.to_string(),
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Get, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Post, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Put, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Delete, path, handler)
    }

    /// Register shared state, retrievable in handlers with `req.state::<T>()`
    ///
    /// One value per type; registering the same type twice replaces it.
    pub fn with_state<T: Clone + Send + Sync + 'static>(mut self, state: T) -> Self {
        self.state.insert(state);
        self
    }

    pub fn state(&self) -> &http::Extensions {
        &self.state
    }

    pub fn names(&self) -> Arc<RouteNames> {
        self.names.clone()
    }

    /// Generate the URL of a named route
    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        self.names.url(name, params)
    }

    /// Match a request against the route table
    pub fn match_route(&self, method: &http::Method, path: &str) -> RouteMatch {
        let path = normalize(path);

        let Some(method) = Method::from_http(method) else {
            return if self.path_exists(path) {
                RouteMatch::MethodNotAllowed
            } else {
                RouteMatch::NotFound
            };
        };

        match self.table(method).at(path) {
            Ok(matched) => {
                let route = &self.routes[*matched.value];
                let params = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                RouteMatch::Found {
                    handler: route.handler.clone(),
                    middleware: route.middleware.clone(),
                    params,
                }
            }
            Err(_) if self.path_exists(path) => RouteMatch::MethodNotAllowed,
            Err(_) => RouteMatch::NotFound,
        }
    }

    fn path_exists(&self, path: &str) -> bool {
        Method::ALL
            .iter()
            .any(|method| self.table(*method).at(path).is_ok())
    }
}

/// Strip a single trailing slash so `/todo/` and `/todo` match the same route
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder returned after registering a route, enabling `.name()` and
/// `.middleware()` on the route just added
pub struct RouteBuilder {
    pub(crate) router: Router,
    last: Option<usize>,
    last_path: String,
}

impl RouteBuilder {
    /// Name the most recently registered route
    pub fn name(mut self, name: &str) -> Self {
        self.router.add_name(name, &self.last_path);
        self
    }

    /// Apply middleware to the most recently registered route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        if let Some(index) = self.last {
            self.router.add_middleware(index, into_boxed(middleware));
        }
        self
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    async fn ok(_req: Request) -> Response {
        HttpResponse::text("ok").ok()
    }

    fn router() -> Router {
        Router::new()
            .get("/todo", ok)
            .post("/todo", ok)
            .get("/todo/{id}", ok)
            .name("todo.show")
            .delete("/todo/{id}", ok)
            .into_router()
    }

    #[test]
    fn test_match_extracts_params() {
        match router().match_route(&http::Method::GET, "/todo/7") {
            RouteMatch::Found { params, .. } => assert_eq!(params["id"], "7"),
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn test_trailing_slash_matches() {
        assert!(matches!(
            router().match_route(&http::Method::GET, "/todo/"),
            RouteMatch::Found { .. }
        ));
    }

    #[test]
    fn test_unknown_path_and_wrong_method() {
        let router = router();
        assert!(matches!(
            router.match_route(&http::Method::GET, "/nope"),
            RouteMatch::NotFound
        ));
        assert!(matches!(
            router.match_route(&http::Method::PUT, "/todo"),
            RouteMatch::MethodNotAllowed
        ));
        assert!(matches!(
            router.match_route(&http::Method::PATCH, "/todo/1"),
            RouteMatch::MethodNotAllowed
        ));
    }

    #[test]
    fn test_named_route_url() {
        let router = router();
        assert_eq!(
            router.url("todo.show", &[("id", "12")]),
            Some("/todo/12".to_string())
        );
        assert_eq!(router.url("todo.missing", &[]), None);
    }

    #[test]
    fn test_conflicting_route_is_skipped() {
        let router = Router::new()
            .get("/todo/{id}", ok)
            .get("/todo/{name}", ok)
            .into_router();
        assert_eq!(router.routes.len(), 1);
    }

    #[test]
    fn test_state_is_stored_by_type() {
        let router = Router::new().with_state(5u8).with_state(6u8);
        assert_eq!(router.state().get::<u8>(), Some(&6));
    }
}
