//! # ppdpack Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used by the archive pipeline and the
//! command-line layer on top of it.
//!
//! ## Architecture
//!
//! The error system consists of three components:
//! - `PackError`: A custom error enum using `thiserror`. Every pipeline stage
//!   (locate, index, bundle, package, decode) returns it unchanged so callers can
//!   match on the exact failure.
//! - `PackResult<T>`: `std::result::Result<T, PackError>`, used by the library.
//! - `Result<T>`: A type alias for `anyhow::Result<T>`, used by the CLI handlers
//!   and config loading where context strings matter more than the variant.
//!
//! Every error is terminal for a build: nothing is retried and no partial
//! artifact is ever produced.
//!
//! ## Examples
//!
//! ```rust
//! use ppdpack::core::error::PackError;
//!
//! # fn classify(err: PackError) {
//! if err.is_build_aborted() {
//!     eprintln!("bad document: {:?}", err.offending_path());
//! }
//! # }
//! ```
//!
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while building or reading a PPD archive.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Failed to read document '{}': {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed document '{}': {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("Document '{}' uses the reserved key 'ARCHIVE'", path.display())]
    ReservedKey { path: PathBuf },

    #[error("Invalid filename pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Resource '{name}' not found in any of {} search location(s)", searched.len())]
    ResourceNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Compression failed while {stage}: {source}")]
    Compression {
        stage: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No record named '{key}' in the archive index")]
    RecordNotFound { key: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PackError {
    /// True for the document-level failures that abort a build while indexing.
    pub fn is_build_aborted(&self) -> bool {
        matches!(
            self,
            PackError::DocumentRead { .. }
                | PackError::MalformedDocument { .. }
                | PackError::ReservedKey { .. }
        )
    }

    /// The document that caused a build abort, if any.
    pub fn offending_path(&self) -> Option<&Path> {
        match self {
            PackError::DocumentRead { path, .. }
            | PackError::MalformedDocument { path, .. }
            | PackError::ReservedKey { path } => Some(path),
            _ => None,
        }
    }
}

/// Result alias for the archive pipeline.
pub type PackResult<T> = std::result::Result<T, PackError>;

/// Type alias for Result using anyhow::Error, used by the CLI layer.
pub type Result<T> = anyhow::Result<T>;
