//! Shared types, error model, and configuration for docsetgen.
//!
//! This crate is the foundation depended on by all other docsetgen crates.
//! It provides:
//! - [`DocsetError`], the unified error type
//! - Domain types ([`DocsetConfig`], [`SearchEntry`])
//! - Config file loading ([`load_config_from`], [`load_entries_from`])

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{CONFIG_FILE_NAME, STARTER_CONFIG, load_config_from, load_entries_from, write_starter_config};
pub use error::{DocsetError, Result};
pub use types::{DEFAULT_INDEX_FILE, DocsetConfig, SearchEntry};
