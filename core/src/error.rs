//! Errors from building requests and interpreting responses.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! treat them differently from other statuses. Every other non-2xx response
//! lands in `HttpError` with the raw status and body. The server reports
//! failures as `{"error": "<message>"}`; `server_message` digs that out so
//! it can be shown to the user verbatim.

use serde::Deserialize;
use thiserror::Error;

use crate::service::ServiceFailure;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the requested record does not exist.
    #[error("resource not found")]
    NotFound { body: String },

    /// 401: missing or rejected bearer token.
    #[error("unauthorized")]
    Unauthorized { body: String },

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never completed (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// The `error` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            ApiError::NotFound { body }
            | ApiError::Unauthorized { body }
            | ApiError::HttpError { body, .. } => body,
            _ => return None,
        };
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.trim().is_empty())
    }
}

impl From<ApiError> for ServiceFailure {
    fn from(err: ApiError) -> Self {
        log::debug!("api error: {err}");
        ServiceFailure {
            message: err.server_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_reads_error_field() {
        let err = ApiError::HttpError {
            status: 400,
            body: r#"{"error":"Invalid date"}"#.to_string(),
        };
        assert_eq!(err.server_message().as_deref(), Some("Invalid date"));
    }

    #[test]
    fn non_json_body_has_no_server_message() {
        let err = ApiError::HttpError {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert!(err.server_message().is_none());
        assert!(ServiceFailure::from(err).message.is_none());
    }

    #[test]
    fn transport_errors_never_leak_into_user_message() {
        let failure = ServiceFailure::from(ApiError::Transport("connection refused".to_string()));
        assert_eq!(failure, ServiceFailure::silent());
    }
}
