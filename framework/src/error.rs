//! Framework-wide error type
//!
//! Every fallible framework call returns `FrameworkError`. It converts into an
//! `HttpResponse` so handlers can propagate it with `?`.

use thiserror::Error;

/// Framework-wide error type
///
/// # Example
///
/// ```rust,ignore
/// use kit::{FrameworkError, Request, Response};
///
/// pub async fn show(req: Request) -> Response {
///     let id: i32 = req.param_as("id")?; // 400 on a malformed id
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// A route parameter the handler asked for was not captured
    #[error("Missing required parameter: {param_name}")]
    ParamError { param_name: String },

    /// A path parameter could not be parsed to the expected type
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        param: String,
        expected_type: &'static str,
    },

    /// The request body or its contents are unusable
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The request body exceeded the configured limit
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{model_name} not found")]
    ModelNotFound { model_name: String },

    /// Missing or rejected credentials
    #[error("Unauthenticated.")]
    Unauthorized,

    /// A handler asked for state that was never registered on the router
    #[error("State '{type_name}' not registered on the router")]
    StateNotFound { type_name: &'static str },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl FrameworkError {
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_name: name.into(),
        }
    }

    pub fn state_not_found<T: ?Sized>() -> Self {
        Self::StateNotFound {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::BadRequest { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::ModelNotFound { .. } => 404,
            Self::Unauthorized => 401,
            Self::StateNotFound { .. } => 500,
            Self::Database(_) => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// Whether this error is the server's fault rather than the caller's
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}
