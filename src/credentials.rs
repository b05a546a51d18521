//! Credential storage shared between request objects.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// The credentials a request carries: an API key for unauthenticated
/// access, the OAuth client pair, the current token pair, and the scopes
/// requested during authorization.
///
/// All fields are plain strings; an empty string means "not set". The
/// request engine only attaches what is present (`key=` query parameter,
/// `Authorization: Bearer` header).
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    pub scopes: Vec<String>,
}

/// Shared, mutable credential state.
///
/// One store is typically shared by every request object of a client so
/// that an access-token refresh performed by one request is immediately
/// visible to all others. Token rewrites are broadcast on a watch channel
/// so consumers can persist the new token.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    inner: Arc<Mutex<Credentials>>,
    access_token_tx: Arc<watch::Sender<String>>,
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        let (access_token_tx, _) = watch::channel(credentials.access_token.clone());
        CredentialStore {
            inner: Arc::new(Mutex::new(credentials)),
            access_token_tx: Arc::new(access_token_tx),
        }
    }

    /// Returns a copy of the current credential set.
    pub fn snapshot(&self) -> Credentials {
        self.inner.lock().expect("credential lock poisoned").clone()
    }

    /// Rewrites the access token and notifies observers.
    ///
    /// This is the only credential the request engine itself mutates (on a
    /// successful refresh); everything else changes only through the
    /// setters below.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.inner.lock().expect("credential lock poisoned").access_token = token.clone();
        self.access_token_tx.send_replace(token);
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.inner.lock().expect("credential lock poisoned").api_key = api_key.into();
    }

    pub fn set_client_id(&self, client_id: impl Into<String>) {
        self.inner.lock().expect("credential lock poisoned").client_id = client_id.into();
    }

    pub fn set_client_secret(&self, client_secret: impl Into<String>) {
        self.inner.lock().expect("credential lock poisoned").client_secret = client_secret.into();
    }

    pub fn set_refresh_token(&self, refresh_token: impl Into<String>) {
        self.inner.lock().expect("credential lock poisoned").refresh_token = refresh_token.into();
    }

    pub fn set_scopes(&self, scopes: Vec<String>) {
        self.inner.lock().expect("credential lock poisoned").scopes = scopes;
    }

    /// Subscribes to access-token rewrites.
    ///
    /// The receiver initially holds the token as of subscription time and
    /// is updated on every [`CredentialStore::set_access_token`] call,
    /// including the engine's own refresh.
    pub fn access_token_changes(&self) -> watch::Receiver<String> {
        self.access_token_tx.subscribe()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        CredentialStore::new(Credentials::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_rewrite_is_broadcast() {
        let store = CredentialStore::new(Credentials {
            access_token: "AT".into(),
            ..Credentials::default()
        });
        let mut changes = store.access_token_changes();
        assert_eq!(*changes.borrow(), "AT");

        store.set_access_token("AT2");
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), "AT2");
        assert_eq!(store.snapshot().access_token, "AT2");
    }
}
