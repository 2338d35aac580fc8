// ── Core error types ──
//
// User-facing errors from reformery-core. Consumers never see reqwest
// types or raw JSON failures; the `From<reformery_api::Error>` impl
// translates transport-layer errors into domain variants, and
// `ErrorInfo` is the cloneable summary stored in state snapshots.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Session expired or invalid -- sign in again")]
    Unauthorized,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach studio API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {}", message.as_deref().unwrap_or("resource does not exist"))]
    NotFound { message: Option<String> },

    #[error("Malformed response payload: {message}")]
    InvalidPayload { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// The server refused the request (non-2xx or `success: false`).
    #[error("Request rejected: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        message: Option<String>,
        status: Option<u16>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status behind this error, when it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Rejected { status, .. } => *status,
            _ => None,
        }
    }

    /// Human-readable text supplied by the server (or by form
    /// validation), suitable for showing verbatim.
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            Self::NotFound { message } | Self::Rejected { message, .. } => message.as_deref(),
            Self::AuthenticationFailed { message } | Self::ValidationFailed { message } => {
                Some(message.as_str())
            }
            _ => None,
        };
        message.filter(|m| !m.trim().is_empty())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<reformery_api::Error> for CoreError {
    fn from(err: reformery_api::Error) -> Self {
        use reformery_api::Error as ApiError;

        match err {
            ApiError::Unauthorized => CoreError::Unauthorized,
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Transport(ref e) => {
                // Timeouts normally arrive as `ApiError::Timeout` with the
                // configured limit; a stray one is reported as unreachable.
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Rejected {
                        message: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            ApiError::Api { status, message } => CoreError::Rejected {
                message,
                status: Some(status),
            },
            ApiError::Rejected { message } => CoreError::Rejected {
                message,
                status: None,
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::InvalidPayload { message }
            }
        }
    }
}

// ── Cloneable error summary ──────────────────────────────────────────

/// Snapshot of a failure, kept in published state (`AggregateState`,
/// per-resource outcomes) where `CoreError` itself cannot be cloned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub unauthorized: bool,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            unauthorized: false,
        }
    }
}

impl From<&CoreError> for ErrorInfo {
    fn from(err: &CoreError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status(),
            unauthorized: err.is_unauthorized(),
        }
    }
}

impl From<CoreError> for ErrorInfo {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_maps_to_not_found() {
        let err = CoreError::from(reformery_api::Error::Api {
            status: 404,
            message: Some("Paquete no encontrado".into()),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(err.server_message(), Some("Paquete no encontrado"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn timeout_keeps_configured_limit() {
        let err = CoreError::from(reformery_api::Error::Timeout { timeout_secs: 15 });
        assert!(matches!(err, CoreError::Timeout { timeout_secs: 15 }));
        assert_eq!(err.to_string(), "Request timed out after 15s");
    }

    #[test]
    fn blank_server_message_is_ignored() {
        let err = CoreError::from(reformery_api::Error::Rejected {
            message: Some("  ".into()),
        });
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn error_info_keeps_unauthorized_flag() {
        let info = ErrorInfo::from(CoreError::from(reformery_api::Error::Unauthorized));
        assert!(info.unauthorized);
        assert_eq!(info.status, Some(401));
    }
}
