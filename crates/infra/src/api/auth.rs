//! Session token supply
//!
//! The Auth Provider owns the session; this module only reads the current
//! bearer token from it. A missing or blank token fails closed with
//! [`AdSyncError::Unauthenticated`] so no request is ever built without one.

use std::sync::Arc;

use adsync_domain::{AdSyncError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

/// Current session as reported by the Auth Provider
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token; `None` when signed out.
    pub access_token: Option<String>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { access_token: Some(token.into()) }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Boundary to whatever issues and validates session tokens
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Read the current session.
    async fn get_session(&self) -> Result<Session>;

    /// Forget the current session. Providers that do not own the session
    /// leave this as a no-op.
    fn clear_session(&self) {}
}

/// Reads bearer tokens for outgoing requests.
#[derive(Clone)]
pub struct TokenSupplier {
    provider: Arc<dyn AuthProvider>,
}

impl TokenSupplier {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    /// Current token, or `None` when there is no usable session.
    ///
    /// A provider failure counts as no session.
    pub async fn get_token(&self) -> Option<String> {
        match self.provider.get_session().await {
            Ok(session) => session.access_token.filter(|token| !token.trim().is_empty()),
            Err(err) => {
                debug!(error = %err, "auth provider failed; treating as signed out");
                None
            }
        }
    }

    /// Current token, failing closed.
    pub async fn require_token(&self) -> Result<String> {
        self.get_token().await.ok_or(AdSyncError::Unauthenticated)
    }
}

impl std::fmt::Debug for TokenSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSupplier").finish_non_exhaustive()
    }
}

/// In-memory Auth Provider holding the token of the signed-in user
#[derive(Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }

    /// Sign in with `token`, replacing any previous one.
    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Sign out.
    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }
}

#[async_trait]
impl AuthProvider for SessionStore {
    async fn get_session(&self) -> Result<Session> {
        Ok(Session { access_token: self.token.read().clone() })
    }

    fn clear_session(&self) {
        self.clear();
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("signed_in", &self.is_signed_in()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl AuthProvider for FailingProvider {
        async fn get_session(&self) -> Result<Session> {
            Err(AdSyncError::Network("auth backend down".into()))
        }
    }

    #[tokio::test]
    async fn test_token_from_store() {
        let store = Arc::new(SessionStore::with_token("abc"));
        let supplier = TokenSupplier::new(store.clone());
        assert_eq!(supplier.get_token().await.as_deref(), Some("abc"));

        store.clear();
        assert_eq!(supplier.get_token().await, None);
        assert_eq!(supplier.require_token().await.unwrap_err(), AdSyncError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_blank_token_is_absent() {
        let supplier = TokenSupplier::new(Arc::new(SessionStore::with_token("  ")));
        assert_eq!(supplier.get_token().await, None);
    }

    #[tokio::test]
    async fn test_provider_failure_fails_closed() {
        let supplier = TokenSupplier::new(Arc::new(FailingProvider));
        assert_eq!(supplier.require_token().await.unwrap_err(), AdSyncError::Unauthenticated);
    }

    #[test]
    fn test_debug_never_prints_token() {
        let rendered = format!("{:?}", Session::with_token("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
