//! CLI error types with miette diagnostics.
//!
//! Maps core, mutation and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use reformery_config::ConfigError;
use reformery_core::{CoreError, ErrorInfo, MutationError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the studio API at {url}")]
    #[diagnostic(
        code(reformery::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             {reason}\n\
             Try: reformery dashboard --api-url http://localhost:5000"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(reformery::timeout),
        help("Increase timeout with --timeout or check the API's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Session ──────────────────────────────────────────────────────
    #[error("Session expired or missing")]
    #[diagnostic(
        code(reformery::unauthorized),
        help(
            "Sign in again with: reformery login\n\
             Or pass a token with --token / REFORMERY_TOKEN."
        )
    )]
    Unauthorized,

    #[error("Sign-in failed: {message}")]
    #[diagnostic(
        code(reformery::auth_failed),
        help("Check the email and password, then run: reformery login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(reformery::not_found),
        help("Run: reformery {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(reformery::rejected))]
    Rejected {
        message: String,
        status: Option<u16>,
    },

    #[error("Dashboard failed to load: {message}")]
    #[diagnostic(
        code(reformery::load_failed),
        help("Every resource failed. Retry once the API is reachable.")
    )]
    LoadFailed { message: String, status: Option<u16> },

    #[error("Unexpected response from the studio API: {message}")]
    #[diagnostic(code(reformery::invalid_payload))]
    InvalidPayload { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(reformery::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(reformery::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: reformery config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No studio API configured")]
    #[diagnostic(
        code(reformery::no_config),
        help(
            "Create a profile with: reformery config init\n\
             Or pass --api-url / REFORMERY_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(reformery::config))]
    Config { message: String },

    #[error("Keyring unavailable: {message}")]
    #[diagnostic(
        code(reformery::keyring),
        help("Set `token_env` on the profile and export the token instead.")
    )]
    Keyring { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(reformery::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Unauthorized | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Rejected { status, .. } | Self::LoadFailed { status, .. } => match status {
                Some(401) => exit_code::AUTH,
                Some(403) => exit_code::PERMISSION,
                Some(404) => exit_code::NOT_FOUND,
                Some(409) => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized => CliError::Unauthorized,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { message } => CliError::Rejected {
                message: message.unwrap_or_else(|| "resource does not exist".into()),
                status: Some(404),
            },

            CoreError::InvalidPayload { message } => CliError::InvalidPayload { message },

            err @ CoreError::Rejected { .. } => CliError::Rejected {
                message: err
                    .server_message()
                    .map_or_else(|| err.to_string(), str::to_owned),
                status: err.status(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<MutationError> for CliError {
    fn from(err: MutationError) -> Self {
        if err.unauthorized {
            return CliError::Unauthorized;
        }
        CliError::Rejected {
            message: err.message,
            status: err.status,
        }
    }
}

impl From<ErrorInfo> for CliError {
    /// A systemic dashboard failure.
    fn from(info: ErrorInfo) -> Self {
        if info.unauthorized {
            return CliError::Unauthorized;
        }
        CliError::LoadFailed {
            message: info.message,
            status: info.status,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
