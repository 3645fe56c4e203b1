//! Request logging

use kit::{async_trait, Middleware, Next, Request, Response};
use std::time::{Duration, Instant};

/// Logs method, path, status and latency of every request
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().clone();
        let path = request.path().to_string();
        let start = Instant::now();

        let response = next.run(request).await;

        let status = match &response {
            Ok(r) | Err(r) => r.status_code(),
        };
        tracing::info!(
            %method,
            %path,
            status,
            elapsed_ms = elapsed_ms(start.elapsed()),
            "request handled"
        );

        response
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_micros(2_500)), 2);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
