//! Text-completion service clients.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};
