//! Application layer for aiaforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, EnhancementService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All build rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArchetypeInfo, // DTO for archetype listings
    ArchiveReport,
    EnhancementService,
    GenerateService,
    GeneratedArchive,
    GenerationNote,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ApiKey, ArchivePacker, CompletionClient, CredentialStore, SessionId};

pub use error::{ApplicationError, EnhancementError};
