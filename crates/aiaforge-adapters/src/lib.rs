//! Infrastructure adapters for aiaforge.
//!
//! This crate implements the ports defined in `aiaforge-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod completion;
pub mod credential_store;
pub mod packer;

// Re-export commonly used adapters
pub use completion::{GeminiClient, GeminiConfig};
pub use credential_store::InMemoryCredentialStore;
pub use packer::ZipPacker;
