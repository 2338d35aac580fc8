use thiserror::Error;

/// Top-level error type for the `reformery-api` crate.
///
/// Covers every failure mode of the studio REST API: session, transport,
/// non-2xx responses, and envelope/payload decoding. `reformery-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// The server answered 401. The session has already been invalidated
    /// by the time this error reaches the caller.
    #[error("Unauthorized -- session invalidated, sign in again")]
    Unauthorized,

    /// Login was refused (bad credentials, inactive account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is taken from the body's `message`,
    /// `error` or `detail` field when present.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose envelope carried `success: false`.
    #[error("Request rejected: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if this is a transient error worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status code, when the failure came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The human-readable message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Rejected { message } => message.as_deref(),
            Self::Authentication { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_server_text() {
        let err = Error::Api {
            status: 400,
            message: Some("Email already registered".into()),
        };
        assert_eq!(
            err.to_string(),
            "API error (HTTP 400): Email already registered"
        );
        assert_eq!(err.server_message(), Some("Email already registered"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn api_error_without_message() {
        let err = Error::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 502): no message");
        assert!(err.is_transient());
        assert!(err.server_message().is_none());
    }

    #[test]
    fn unauthorized_reports_401() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert_eq!(Error::Unauthorized.status(), Some(401));
        assert!(!Error::Unauthorized.is_transient());
    }
}
