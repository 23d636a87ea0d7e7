//! Remote provider implementations
//!
//! Each provider implements the RemoteAnalyzer trait.

pub mod openai;

// Re-export provider implementations
pub use openai::OpenAIProvider;
