//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::time::Duration;

use thiserror::Error;

use crate::domain::ExtractionError;
use crate::error::ErrorCategory;

/// Fatal errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The archive packer could not produce or read bytes.
    #[error("Packaging failed: {reason}")]
    Packaging { reason: String },

    /// Credential store access failed (lock poisoned).
    #[error("Credential store error")]
    CredentialStoreLock,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Packaging { reason } => vec![
                format!("Could not build the archive: {}", reason),
                "This is likely a bug; please report it".into(),
            ],
            Self::CredentialStoreLock => vec![
                "The credential store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Packaging { .. } | Self::CredentialStoreLock => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}

/// Why AI enhancement produced nothing usable.
///
/// Always soft: the build continues as if enhancement was not requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnhancementError {
    #[error("no API key available for AI enhancement")]
    MissingCredential,

    /// The credential store failed; the key could not be read.
    #[error("could not read the stored API key: {0}")]
    CredentialLookup(String),

    #[error("no AI completion client is configured")]
    NotConfigured,

    #[error("AI service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("could not reach AI service: {0}")]
    Connection(String),

    #[error("AI service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI response had no text content")]
    MissingContent,

    #[error("AI response was not usable JSON: {0}")]
    Unparseable(String),

    #[error("AI response did not contain any components")]
    NoComponents,
}

impl EnhancementError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Pass --api-key or set the key environment variable",
            Self::CredentialLookup(_) => "Try again; the API key will be stored afresh",
            Self::NotConfigured => "Wire a completion client before enabling enhancement",
            Self::Timeout(_) | Self::Connection(_) => "Check your network or raise ai.timeout_secs",
            Self::Status { status: 401 | 403, .. } => "Check that the API key is valid",
            Self::Status { .. } => "The AI service rejected the request; try again later",
            Self::MissingContent | Self::Unparseable(_) | Self::NoComponents => {
                "Rephrase the prompt or generate without --enhance"
            }
        }
    }
}

impl From<ExtractionError> for EnhancementError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoComponentList => Self::NoComponents,
            other => Self::Unparseable(other.to_string()),
        }
    }
}
