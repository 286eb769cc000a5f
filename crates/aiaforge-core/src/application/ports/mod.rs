//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `aiaforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `CompletionClient`: AI text completion
//!   - `ArchivePacker`: Zip container encode/decode
//!   - `CredentialStore`: Session-scoped API keys
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{ApiKey, ArchivePacker, CompletionClient, CredentialStore, SessionId};
