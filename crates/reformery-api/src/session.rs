// Session credentials shared by every outbound request.
//
// The bearer token is the only process-wide mutable state of the client.
// It lives in one `SessionContext` that is handed to the `ApiClient` by
// reference; a 401 from any endpoint clears it and raises `Unauthorized`
// for whoever owns the session lifecycle.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const SESSION_EVENT_CAPACITY: usize = 16;

/// Lifecycle notifications emitted by a [`SessionContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was installed.
    SignedIn,
    /// The token was cleared on request (logout).
    SignedOut,
    /// The server rejected the token; it has been cleared.
    Unauthorized,
}

/// Owner of the bearer token used by every API call.
pub struct SessionContext {
    token: ArcSwapOption<SecretString>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    /// An empty, signed-out session.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            token: ArcSwapOption::empty(),
            events,
        }
    }

    /// A session restored from persisted storage.
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.token.store(Some(Arc::new(token)));
        session
    }

    /// The current token, if signed in.
    pub fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    /// Install a fresh token (after login).
    pub fn sign_in(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
        debug!("session signed in");
        let _ = self.events.send(SessionEvent::SignedIn);
    }

    /// Clear the token on explicit logout.
    pub fn sign_out(&self) {
        self.token.store(None);
        debug!("session signed out");
        let _ = self.events.send(SessionEvent::SignedOut);
    }

    /// Clear the token because the server answered 401.
    pub fn invalidate(&self) {
        self.token.store(None);
        warn!("server rejected session token; credentials cleared");
        let _ = self.events.send(SessionEvent::Unauthorized);
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn invalidate_clears_token_and_emits_event() {
        let session = SessionContext::with_token(SecretString::from("abc".to_owned()));
        let mut rx = session.subscribe();
        assert!(session.is_authenticated());

        session.invalidate();

        assert!(!session.is_authenticated());
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::Unauthorized));
    }

    #[test]
    fn sign_in_replaces_token() {
        let session = SessionContext::new();
        session.sign_in(SecretString::from("first".to_owned()));
        session.sign_in(SecretString::from("second".to_owned()));
        let token = session.token().map(|t| t.expose_secret().to_owned());
        assert_eq!(token.as_deref(), Some("second"));
    }
}
