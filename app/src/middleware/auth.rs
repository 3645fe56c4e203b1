//! Bearer token authentication

use kit::{async_trait, FrameworkError, HttpResponse, Middleware, Next, Request, Response};
use std::collections::HashSet;
use std::sync::Arc;

/// Rejects requests whose `Authorization: Bearer` token is not configured
///
/// With an empty token set every request is rejected.
#[derive(Clone)]
pub struct AuthMiddleware {
    tokens: Arc<HashSet<String>>,
}

impl AuthMiddleware {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Arc::new(tokens.into_iter().map(Into::into).collect()),
        }
    }

    fn accepts(&self, request: &Request) -> bool {
        request
            .bearer_token()
            .is_some_and(|token| self.tokens.contains(token))
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if !self.accepts(&request) {
            tracing::debug!(path = request.path(), "rejected unauthenticated request");
            return Err(HttpResponse::from(FrameworkError::Unauthorized)
                .header("WWW-Authenticate", "Bearer"));
        }

        next.run(request).await
    }
}
