//! Credential stores.

mod memory;

pub use memory::InMemoryCredentialStore;
