//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `aiaforge-adapters` crate provides implementations.

use std::fmt;

use crate::application::EnhancementError;
use crate::domain::ArchiveLayout;
use crate::error::ForgeResult;

/// Secret used to call the completion service. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        (!key.is_empty()).then_some(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Opaque caller identifier that scopes stored credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Port for the external text-completion service.
///
/// Implemented by:
/// - `aiaforge_adapters::completion::GeminiClient` (production)
///
/// One call, bounded by the implementation's timeout. Implementations
/// must not retry.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionClient: Send + Sync {
    /// Return the completion text for `prompt`.
    fn complete(&self, key: &ApiKey, prompt: &str) -> Result<String, EnhancementError>;
}

/// Port for turning an [`ArchiveLayout`] into container bytes and back.
///
/// Implemented by:
/// - `aiaforge_adapters::packer::ZipPacker` (deflate zip)
#[cfg_attr(test, mockall::automock)]
pub trait ArchivePacker: Send + Sync {
    fn pack(&self, layout: &ArchiveLayout) -> ForgeResult<Vec<u8>>;

    /// Read an archive back, in stored order.
    fn unpack(&self, bytes: &[u8]) -> ForgeResult<ArchiveLayout>;
}

/// Port for session-scoped credentials.
///
/// Implemented by:
/// - `aiaforge_adapters::credential_store::InMemoryCredentialStore`
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Store (or replace) the key for a session.
    fn store(&self, session: &SessionId, key: ApiKey) -> ForgeResult<()>;

    fn lookup(&self, session: &SessionId) -> ForgeResult<Option<ApiKey>>;

    /// Remove the key. Returns whether one was present.
    fn revoke(&self, session: &SessionId) -> ForgeResult<bool>;
}
