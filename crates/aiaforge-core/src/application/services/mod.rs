//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate an archive" or "ask the AI for a layout".

pub mod enhancement_service;
pub mod generate_service;

pub use enhancement_service::EnhancementService;
pub use generate_service::{
    ArchetypeInfo, ArchiveReport, GenerateService, GeneratedArchive, GenerationNote,
};
