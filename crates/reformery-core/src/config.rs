// ── Runtime client configuration ──
//
// These types describe *how* to reach the studio API. They carry the
// session token and transport tuning, but never touch disk.
// The CLI constructs a `ClientConfig` and hands it in.

use std::sync::Arc;
use std::time::Duration;

use reformery_api::client::DEFAULT_API_ROOT;
use reformery_api::transport::DEFAULT_TIMEOUT;
use reformery_api::{ApiClient, SessionContext, TlsMode, TransportConfig};
use secrecy::SecretString;

use crate::error::CoreError;
use crate::notification::DEFAULT_NOTIFICATION_TTL;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to one studio API deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; `/api/v1` is appended when missing.
    pub api_url: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How long a status banner stays visible.
    pub notification_ttl: Duration,
    /// Persisted session token, if the user has signed in before.
    pub token: Option<SecretString>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_ROOT.into(),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            token: None,
        }
    }
}

impl ClientConfig {
    /// Build the API client and the session it owns.
    pub fn build_client(&self) -> Result<Arc<ApiClient>, CoreError> {
        let session = match &self.token {
            Some(token) => SessionContext::with_token(token.clone()),
            None => SessionContext::new(),
        };
        let client = ApiClient::new(&self.api_url, Arc::new(session), &self.transport())?;
        Ok(Arc::new(client))
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
