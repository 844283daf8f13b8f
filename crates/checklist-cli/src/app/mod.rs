//! Application-level utilities for the Checklist CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - Key resolution with the `user@host` fallback
//! - The per-invocation application context

mod context;
mod key;
mod resolver;

// Re-export public API
pub use context::AppContext;
