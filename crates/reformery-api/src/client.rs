// Studio API HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization, bearer-token
// injection from the shared `SessionContext`, and `{ success, data, message }`
// envelope unwrapping. Endpoint groups (users, packages, ...) are inherent
// methods implemented in sibling modules.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ApiEnvelope, ErrorBody};
use crate::session::SessionContext;
use crate::transport::TransportConfig;

/// Fallback root when no API URL is configured.
pub const DEFAULT_API_ROOT: &str = "http://localhost:5000/api/v1";

/// HTTP client for the studio REST API.
///
/// Every request carries the session's bearer token when one is present.
/// A 401 from any endpoint invalidates the session before the error is
/// returned, so the owner of the [`SessionContext`] can react regardless of
/// which call tripped it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionContext>,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client from a configured API root and transport settings.
    ///
    /// The root is normalized with [`normalize_api_root`].
    pub fn new(
        api_root: &str,
        session: Arc<SessionContext>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_api_root(api_root)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            session,
            timeout: transport.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// `base_url` is used verbatim (no `/api/v1` suffixing), which is what
    /// tests against a mock server want.
    pub fn with_client(http: reqwest::Client, base_url: Url, session: Arc<SessionContext>) -> Self {
        Self {
            http,
            base_url,
            session,
            timeout: crate::transport::DEFAULT_TIMEOUT,
        }
    }

    /// The shared session this client authenticates with.
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// The normalized API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for flows that need the raw response).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}?{query}`. Empty query values are skipped.
    pub(crate) fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&full)?;
        let pairs: Vec<_> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !pairs.is_empty() {
            let mut qp = url.query_pairs_mut();
            for (key, value) in pairs {
                qp.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a resource and unwrap its `data` field.
    ///
    /// An absent or `null` `data` yields `T::default()` (an empty list for
    /// collections) so callers never see a missing payload.
    pub(crate) async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.url(path, query)?;
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        Ok(self.parse_envelope(resp).await?.unwrap_or_default())
    }

    /// POST a JSON body; returns the echoed record if the server sent one.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path, &[])?;
        debug!("POST {}", url);
        let resp = self.send(self.http.post(url).json(body)).await?;
        self.parse_envelope(resp).await
    }

    /// PUT a JSON body; returns the echoed record if the server sent one.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path, &[])?;
        debug!("PUT {}", url);
        let resp = self.send(self.http.put(url).json(body)).await?;
        self.parse_envelope(resp).await
    }

    /// PATCH a JSON body; returns the echoed record if the server sent one.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path, &[])?;
        debug!("PATCH {}", url);
        let resp = self.send(self.http.patch(url).json(body)).await?;
        self.parse_envelope(resp).await
    }

    /// DELETE a resource.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.url(path, &[])?;
        debug!("DELETE {}", url);
        let resp = self.send(self.http.delete(url)).await?;
        self.parse_envelope(resp).await
    }

    /// Attach the bearer token and send.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        request.send().await.map_err(|e| self.transport_error(e))
    }

    /// Map a reqwest failure, reporting timeouts with the configured limit.
    pub(crate) fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }

    /// Parse the `{ success, data, message }` envelope.
    ///
    /// - 401: invalidates the session, returns [`Error::Unauthorized`]
    /// - other non-2xx: [`Error::Api`] with the body's message, if parsable
    /// - `success: false`: [`Error::Rejected`]
    /// - empty body (e.g. 204): `Ok(None)`
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(Error::Unauthorized);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: ErrorBody::extract(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if !envelope.success {
            return Err(Error::Rejected {
                message: envelope.message.or(envelope.error),
            });
        }

        Ok(envelope.data)
    }
}

/// Normalize a configured API root.
///
/// Trailing slashes are trimmed. A root that does not already end in
/// `/api` or `/api/vN` gets `/api/v1` appended. An empty root falls back
/// to [`DEFAULT_API_ROOT`].
pub fn normalize_api_root(root: &str) -> Result<Url, Error> {
    let trimmed = root.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Url::parse(DEFAULT_API_ROOT)?);
    }

    let full = if has_api_suffix(trimmed) {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/api/v1")
    };
    Ok(Url::parse(&full)?)
}

fn has_api_suffix(root: &str) -> bool {
    let lower = root.to_ascii_lowercase();
    if lower.ends_with("/api") {
        return true;
    }
    match lower.rsplit_once("/api/v") {
        Some((_, version)) => !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
