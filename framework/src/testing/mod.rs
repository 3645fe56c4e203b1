//! In-process test client
//!
//! Drives a `Server` without opening a socket, so integration tests exercise
//! routing, middleware and handlers exactly as a real request would.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::testing::TestClient;
//!
//! #[tokio::test]
//! async fn lists_items() {
//!     let client = TestClient::new(Server::new(routes::register(store, &config)))
//!         .with_bearer("secret");
//!
//!     let response = client.get("/api/todo").await;
//!     assert_eq!(response.status(), 200);
//! }
//! ```

use crate::Server;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Client that dispatches requests straight into `Server::handle`
#[derive(Clone)]
pub struct TestClient {
    server: Arc<Server>,
    bearer: Option<String>,
}

impl TestClient {
    pub fn new(server: Server) -> Self {
        Self {
            server: Arc::new(server),
            bearer: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request from this client
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Drop any configured bearer token
    pub fn without_bearer(mut self) -> Self {
        self.bearer = None;
        self
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None).await
    }

    pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send("POST", uri, Some(to_json(body))).await
    }

    pub async fn put_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send("PUT", uri, Some(to_json(body))).await
    }

    /// Send a raw body with an `application/json` content type, valid or not
    pub async fn send_raw(&self, method: &str, uri: &str, body: &str) -> TestResponse {
        self.send(method, uri, Some(Bytes::from(body.to_string())))
            .await
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Bytes>) -> TestResponse {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(token) = &self.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        let request = builder
            .body(body.unwrap_or_default())
            .expect("test request must be well-formed");

        let response = self.server.handle(request).await;
        let (parts, body) = response.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        TestResponse {
            status: parts.status.as_u16(),
            headers: parts.headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(body: &T) -> Bytes {
    Bytes::from(serde_json::to_vec(body).expect("test body must serialize"))
}

/// Fully-buffered response returned by `TestClient`
#[derive(Debug)]
pub struct TestResponse {
    status: u16,
    headers: http::HeaderMap,
    body: Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not the expected JSON ({}): {}",
                e,
                self.text()
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
