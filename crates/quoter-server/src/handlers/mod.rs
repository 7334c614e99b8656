//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod health;
pub mod quote;
pub mod reference;

// Re-export all handlers for use in router
pub use health::*;
pub use quote::*;
pub use reference::*;
