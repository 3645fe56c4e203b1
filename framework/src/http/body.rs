//! Body collection and parsing helpers

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use serde::de::DeserializeOwned;

/// Collect a full request body, rejecting anything larger than `limit` bytes
pub async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, FrameworkError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(FrameworkError::PayloadTooLarge { limit }),
        Err(e) => Err(FrameworkError::bad_request(format!(
            "Failed to read request body: {}",
            e
        ))),
    }
}

/// Parse bytes as JSON into the target type
///
/// Malformed or mistyped JSON is the caller's fault, so it maps to 400.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FrameworkError> {
    serde_json::from_slice(bytes)
        .map_err(|e| FrameworkError::bad_request(format!("Failed to parse JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[tokio::test]
    async fn test_collect_body_within_limit() {
        let bytes = collect_body(Full::new(Bytes::from_static(b"hello")), 16)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_collect_body_over_limit() {
        let err = collect_body(Full::new(Bytes::from_static(b"hello world")), 4)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 413);
    }

    #[test]
    fn test_parse_json_ok_and_malformed() {
        let parsed: Payload = parse_json(br#"{"name":"x"}"#).unwrap();
        assert_eq!(parsed, Payload { name: "x".into() });

        let err = parse_json::<Payload>(b"{not json").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
