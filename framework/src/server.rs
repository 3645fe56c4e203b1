use crate::config::ServerConfig;
use crate::error::FrameworkError;
use crate::http::{collect_body, HttpResponse, Request, Response};
use crate::middleware::{BoxFuture, Middleware, MiddlewareChain, MiddlewareRegistry};
use crate::routing::{BoxedHandler, RouteMatch, Router};
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP/1 server dispatching requests through the middleware chain to the router
pub struct Server {
    router: Arc<Router>,
    middleware: MiddlewareRegistry,
    host: String,
    port: u16,
    max_body_size: usize,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            router: Arc::new(router.into()),
            middleware: MiddlewareRegistry::new(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_body_size: 10 * 1024 * 1024,
        }
    }

    pub fn from_config(router: impl Into<Router>, config: &ServerConfig) -> Self {
        Self::new(router)
            .host(&config.host)
            .port(config.port)
            .max_body_size(config.max_body_size)
    }

    /// Add global middleware (runs on every request, matched or not)
    ///
    /// For route-specific middleware, use `.middleware(M)` on the route or group.
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.append(middleware);
        self
    }

    /// Replace the global middleware stack wholesale
    pub fn middleware_registry(mut self, registry: MiddlewareRegistry) -> Self {
        self.middleware = registry;
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Bind to the configured host and port and serve until Ctrl+C
    pub async fn run(self) -> Result<(), FrameworkError> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                FrameworkError::internal(format!(
                    "Failed to bind {}:{}: {}",
                    self.host, self.port, e
                ))
            })?;
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener until Ctrl+C
    ///
    /// Each connection runs on its own task; connections never share state
    /// beyond the router.
    pub async fn serve(self, listener: TcpListener) -> Result<(), FrameworkError> {
        let addr = listener
            .local_addr()
            .map_err(|e| FrameworkError::internal(e.to_string()))?;
        tracing::info!(%addr, "server listening");

        let server = Arc::new(self);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let (stream, remote) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let server = server.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let server = server.clone();
                    async move { Ok::<_, Infallible>(server.handle_incoming(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::warn!(%remote, error = %err, "error serving connection");
                }
            });
        }
    }

    async fn handle_incoming(
        &self,
        req: hyper::Request<hyper::body::Incoming>,
    ) -> http::Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();
        match collect_body(body, self.max_body_size).await {
            Ok(bytes) => self.handle(http::Request::from_parts(parts, bytes)).await,
            Err(e) => HttpResponse::from(e).into_hyper(),
        }
    }

    /// Dispatch a fully-read request and return the response
    ///
    /// This is the whole request path minus socket I/O, so tests can drive
    /// the application in-process.
    pub async fn handle(&self, req: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        if req.body().len() > self.max_body_size {
            return HttpResponse::from(FrameworkError::PayloadTooLarge {
                limit: self.max_body_size,
            })
            .into_hyper();
        }

        self.dispatch(req).await.into_hyper()
    }

    async fn dispatch(&self, req: http::Request<Bytes>) -> HttpResponse {
        let (handler, route_middleware, params) =
            match self.router.match_route(req.method(), req.uri().path()) {
                RouteMatch::Found {
                    handler,
                    middleware,
                    params,
                } => (handler, middleware, params),
                RouteMatch::MethodNotAllowed => (fallback(405), Vec::new(), HashMap::new()),
                RouteMatch::NotFound => (fallback(404), Vec::new(), HashMap::new()),
            };

        let request = Request::new(req)
            .with_params(params)
            .with_routes(self.router.names())
            .with_state(self.router.state().clone());

        let mut chain = MiddlewareChain::new();
        chain.extend(self.middleware.global_middleware().iter().cloned());
        chain.extend(route_middleware);

        // Both Ok and Err carry a response
        chain.execute(request, handler).await.unwrap_or_else(|e| e)
    }
}

/// Handler for requests that matched no route
fn fallback(status: u16) -> Arc<BoxedHandler> {
    let message = match status {
        405 => "405 Method Not Allowed",
        _ => "404 Not Found",
    };
    let boxed: BoxedHandler = Box::new(move |_req| -> BoxFuture<Response> {
        Box::pin(async move { Err(HttpResponse::text(message).status(status)) })
    });
    Arc::new(boxed)
}
