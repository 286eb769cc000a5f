//! In-memory credential store keyed by session.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use aiaforge_core::{
    application::{
        ApplicationError,
        ports::{ApiKey, CredentialStore, SessionId},
    },
    error::ForgeResult,
};

/// Thread-safe session-to-key map. Clones share the same entries.
#[derive(Clone)]
pub struct InMemoryCredentialStore {
    inner: Arc<RwLock<HashMap<SessionId, ApiKey>>>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of sessions holding a key.
    pub fn len(&self) -> ForgeResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::CredentialStoreLock)?;
        Ok(inner.len())
    }

    pub fn is_empty(&self) -> ForgeResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn store(&self, session: &SessionId, key: ApiKey) -> ForgeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CredentialStoreLock)?;
        inner.insert(session.clone(), key);
        debug!(session = %session, "Stored API key");
        Ok(())
    }

    fn lookup(&self, session: &SessionId) -> ForgeResult<Option<ApiKey>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::CredentialStoreLock)?;
        Ok(inner.get(session).cloned())
    }

    fn revoke(&self, session: &SessionId) -> ForgeResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CredentialStoreLock)?;
        let removed = inner.remove(session).is_some();
        debug!(session = %session, removed, "Revoked API key");
        Ok(removed)
    }
}
