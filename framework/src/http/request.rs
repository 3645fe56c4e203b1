use super::body::parse_json;
use crate::error::FrameworkError;
use crate::routing::RouteNames;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// HTTP request handed to middleware and handlers
///
/// The server collects the body before dispatch, so a `Request` can be read
/// any number of times and built directly in tests.
pub struct Request {
    inner: http::Request<Bytes>,
    params: HashMap<String, String>,
    routes: Arc<RouteNames>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self {
            inner,
            params: HashMap::new(),
            routes: Arc::new(RouteNames::default()),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub(crate) fn with_routes(mut self, routes: Arc<RouteNames>) -> Self {
        self.routes = routes;
        self
    }

    pub(crate) fn with_state(mut self, state: http::Extensions) -> Self {
        self.inner.extensions_mut().extend(state);
        self
    }

    pub fn method(&self) -> &http::Method {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Get a route parameter by name (e.g. `/todo/{id}`)
    pub fn param(&self, name: &str) -> Result<&str, FrameworkError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| FrameworkError::param(name))
    }

    /// Get a route parameter parsed into `T`
    ///
    /// Fails with 400 when the parameter is missing or does not parse.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(raw, std::any::type_name::<T>()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Token from an `Authorization: Bearer <token>` header
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.header("authorization")?;
        let (scheme, token) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// Parse the request body as JSON
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// pub async fn store(req: Request) -> Response {
    ///     let payload: TodoPayload = req.json()?;
    ///     // ...
    /// }
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(self.inner.body())
    }

    /// Shared state registered with `Router::with_state`
    pub fn state<T: Send + Sync + 'static>(&self) -> Result<&T, FrameworkError> {
        self.inner
            .extensions()
            .get::<T>()
            .ok_or_else(FrameworkError::state_not_found::<T>)
    }

    /// Build the URL of a named route, substituting `{key}` placeholders
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        self.routes.url(name, params)
    }
}
