//! # sihook common library
//!
//! Shared code for the search index hook crates:
//! - Error type shared across crates
//! - Bootstrap configuration (TOML file + environment overrides)
//! - Time helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
