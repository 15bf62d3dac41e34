//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("WebSocket error: {0}")]
    Ws(#[from] WsError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Whether this failure is a deliberate "endpoint not available yet" stub
    /// rather than a real error. UIs render an inert state for these.
    pub fn is_feature_unavailable(&self) -> bool {
        matches!(self, SdkError::Http(HttpError::FeatureUnavailable(_)))
    }

    /// Text suitable for a transient user notification.
    ///
    /// Prefers the server-provided detail over the generic status wording.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Http(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("Feature unavailable: {0}")]
    FeatureUnavailable(String),
}

impl HttpError {
    /// HTTP status code, when the failure came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::ServerError { status, .. } => Some(*status),
            HttpError::RateLimited { .. } => Some(429),
            HttpError::Unauthorized(_) => Some(401),
            HttpError::NotFound(_) => Some(404),
            HttpError::BadRequest { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            HttpError::NotFound(msg) if msg.is_empty() => "Not found".to_string(),
            HttpError::Unauthorized(msg) if msg.is_empty() => "Unauthorized".to_string(),
            HttpError::BadRequest { status, message } if message.is_empty() => {
                format!("Request rejected ({})", status)
            }
            other => other.to_string(),
        }
    }
}

/// WebSocket errors.
#[derive(Error, Debug, Clone)]
pub enum WsError {
    #[error("Not connected")]
    NotConnected,

    #[error("Invalid WebSocket URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Connection closed: code={code:?} reason={reason}")]
    Closed {
        code: Option<u16>,
        reason: String,
    },
}

/// Extract the human-readable message from an error response body.
///
/// Backends answer with `{"error": "..."}`, `{"detail": "..."}` or FastAPI's
/// validation shape `{"detail": [{"msg": "..."}, ...]}`. Anything else is
/// returned trimmed as-is.
pub fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    for key in ["error", "detail", "message"] {
        match value.get(key) {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg") {
                        Some(serde_json::Value::String(m)) => m.clone(),
                        _ => item.to_string(),
                    })
                    .collect();
                if !parts.is_empty() {
                    return parts.join("; ");
                }
            }
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    trimmed.to_string()
}
