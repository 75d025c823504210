//! # Akbo Shared
//!
//! Common types used across the akbo application crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
