//! sift-shared: Shared types and utilities for sift crates
//!
//! This crate contains the pieces used by more than one sift crate: the
//! application-level result alias, version and build metadata, and the
//! limits shared between the parser and the command-line front end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

/// Result type alias for application-level sift operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information structure
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Package version
    pub version: &'static str,
    /// Git commit hash (if available)
    pub git_hash: Option<&'static str>,
    /// Build timestamp (if available)
    pub build_date: Option<&'static str>,
    /// Rust compiler version (if available)
    pub rust_version: Option<&'static str>,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "sift {}", self.version)?;

        if let Some(hash) = self.git_hash {
            writeln!(f, "Git hash: {hash}")?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {date}")?;
        }

        if let Some(rust_ver) = self.rust_version {
            writeln!(f, "Rust: {rust_ver}")?;
        }

        Ok(())
    }
}

/// Common error handling utilities
pub mod error {
    /// Create a configuration error
    pub fn config_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Configuration error: {}", msg.into())
    }

    /// Create an input error (unreadable or malformed data to match against)
    pub fn input_error(msg: impl Into<String>) -> anyhow::Error {
        anyhow::anyhow!("Input error: {}", msg.into())
    }
}

/// Common constants
pub mod constants {
    /// Default maximum nesting depth of parenthesised groups
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Hard ceiling for a configured nesting depth
    pub const MAX_ALLOWED_DEPTH: usize = 4096;
}
