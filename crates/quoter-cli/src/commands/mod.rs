//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config resolution, engine loading)
//! - `quote` - One-shot quote computation from a JSON profile
//! - `serve` - Web server command
//! - `validate` - Artifact validation and summary

pub mod core;
pub mod quote;
pub mod serve;
pub mod validate;

// Re-export command functions for main.rs
pub use core::*;
pub use quote::*;
pub use serve::*;
pub use validate::*;
