//! aiaforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the aiaforge
//! App Inventor project generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          aiaforge-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerateService, EnhancementService)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: Packer, Completion, Creds)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    aiaforge-adapters (Infrastructure)   │
//! │ (ZipPacker, GeminiClient, MemoryStore)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Tree builder, blocks, serializer)      │
//! │              No I/O                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aiaforge_core::{
//!     application::GenerateService,
//!     domain::{AppSpec, Archetype},
//! };
//!
//! // 1. Describe the app
//! let spec = AppSpec::builder()
//!     .name("Counter Demo")
//!     .archetype(Archetype::Counter)
//!     .build()
//!     .unwrap();
//!
//! // 2. Use application service (with injected adapters)
//! let service = GenerateService::new(packer);
//! let archive = service.generate(&spec).unwrap();
//! std::fs::write(&archive.file_name, &archive.bytes).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ArchetypeInfo, ArchiveReport, EnhancementError, EnhancementService, GenerateService,
        GeneratedArchive, GenerationNote,
        ports::{ApiKey, ArchivePacker, CompletionClient, CredentialStore, SessionId},
    };
    pub use crate::domain::{
        AppSpec, AppSpecBuilder, Archetype, ArchiveLayout, ArchiveMember, ComponentNode,
        ComponentType, ProjectDocument, TreeSource,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
