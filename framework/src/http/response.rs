use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;

/// HTTP response builder
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
    headers: Vec<(String, String)>,
}

/// Response type alias - allows using `?` operator for early returns
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: Bytes::new(),
            headers: Vec::new(),
        }
    }

    /// Response with the given status and no body
    pub fn empty(status: u16) -> Self {
        Self::new().status(status)
    }

    /// 204 No Content
    pub fn no_content() -> Self {
        Self::empty(204)
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.into()),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        }
    }

    /// JSON response from any serializable value
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, FrameworkError> {
        let body = serde_json::to_vec(value)
            .map_err(|e| FrameworkError::internal(format!("Failed to serialize response: {}", e)))?;
        Ok(Self {
            status: 200,
            body: Bytes::from(body),
            headers: vec![(
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )],
        })
    }

    /// JSON response from a `serde_json::Value`
    pub fn json_value(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.to_string()),
            headers: vec![(
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )],
        }
    }

    /// 201 Created with a JSON body and a `Location` header
    pub fn created<T: Serialize + ?Sized>(
        location: impl Into<String>,
        value: &T,
    ) -> Result<Self, FrameworkError> {
        Ok(Self::json(value)?.status(201).header("Location", location))
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Wrap this response in Ok() for use as Response type
    pub fn ok(self) -> Response {
        Ok(self)
    }

    /// Convert into a hyper response
    ///
    /// A status or header that the `http` crate rejects yields a bare 500.
    pub fn into_hyper(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            tracing::error!(error = %e, "invalid response parts");
            let mut fallback = http::Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Auto-convert FrameworkError to HttpResponse
///
/// This enables using the `?` operator in handlers to propagate framework
/// errors as `{"error": ...}` JSON responses with the mapped status.
impl From<FrameworkError> for HttpResponse {
    fn from(err: FrameworkError) -> HttpResponse {
        let status = err.status_code();
        if err.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        HttpResponse::json_value(serde_json::json!({ "error": err.to_string() })).status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_sets_status_and_location() {
        let resp = HttpResponse::created("/api/todo/1", &serde_json::json!({"id": 1})).unwrap();
        assert_eq!(resp.status_code(), 201);
        assert_eq!(resp.header_value("location"), Some("/api/todo/1"));
        assert_eq!(&resp.body()[..], br#"{"id":1}"#);
    }

    #[test]
    fn test_no_content_has_empty_body() {
        let resp = HttpResponse::no_content();
        assert_eq!(resp.status_code(), 204);
        assert!(resp.body().is_empty());
    }

    #[test]
    fn test_framework_error_into_response() {
        let resp: HttpResponse = FrameworkError::model_not_found("Todo").into();
        assert_eq!(resp.status_code(), 404);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Todo not found");
    }

    #[test]
    fn test_into_hyper_rejects_invalid_status() {
        let resp = HttpResponse::empty(42).into_hyper();
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
