// Login / logout
//
// Login is the one call where a non-2xx answer is not a session event:
// a 401 here means bad credentials, so the raw response is handled
// directly instead of going through envelope parsing.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ErrorBody, User};
use crate::requests::LoginRequest;

/// Result of a successful login. The token has already been installed in
/// the client's session; it is returned so callers can persist it.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: SecretString,
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default, alias = "access_token", alias = "accessToken")]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

/// Servers answer either `{ success, data: { token, user } }` or a bare
/// `{ access_token }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoginBody {
    Enveloped { data: TokenPayload },
    Bare(TokenPayload),
}

impl ApiClient {
    /// Authenticate and sign the session in.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginSession, Error> {
        let url = self.url("auth/login", &[])?;
        debug!(email, "logging in");

        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let resp = self.send(self.http().post(url).json(&body)).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Authentication {
                message: ErrorBody::extract(&text)
                    .unwrap_or_else(|| format!("login rejected (HTTP {})", status.as_u16())),
            });
        }

        let parsed: LoginBody = serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text.clone(),
        })?;
        let payload = match parsed {
            LoginBody::Enveloped { data } | LoginBody::Bare(data) => data,
        };

        let token = payload
            .token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| Error::Authentication {
                message: "login response did not include a token".into(),
            })?;

        self.session().sign_in(token.clone());
        Ok(LoginSession {
            token,
            user: payload.user,
        })
    }

    /// Drop the session token. The API is stateless, so this is local only.
    pub fn logout(&self) {
        self.session().sign_out();
    }
}
