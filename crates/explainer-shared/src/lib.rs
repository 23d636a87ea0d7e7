//! # Explainer Shared
//!
//! Shared types, errors, and configuration for Context Explainer.
//! This crate provides the foundation types used by the core engine and the CLI.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::*;
pub use error::*;
pub use types::*;

/// Version information for Context Explainer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
