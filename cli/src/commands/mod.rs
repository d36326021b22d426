//! # ppdpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the `ppdpack` binary. Each
//! command defines its own Clap arguments struct and a `handle_*` function that
//! loads configuration, calls into the library, and writes output.
//!
//! ## Commands
//!
//! - `build`: Pack a directory of PPD files into an artifact.
//! - `list`: Print the driver list stored in an artifact.
//! - `cat`: Print one original PPD file from an artifact.
//!

/// Packs a PPD tree into a distributable artifact.
pub mod build;
/// Prints one document from an artifact.
pub mod cat;
/// Lists the drivers indexed in an artifact.
pub mod list;

use anyhow::Context;
use ppdpack::core::config::Config;
use ppdpack::core::error::Result;
use ppdpack::pack::index::Index;
use ppdpack::pack::reader;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads an artifact file and decodes its index using the configured resources.
pub(crate) fn open_artifact(
    config: &Config,
    artifact: &Path,
    resource_dirs: &[PathBuf],
) -> Result<Index> {
    let text = fs::read_to_string(artifact)
        .with_context(|| format!("Failed to read artifact '{}'", artifact.display()))?;
    let packager = config.packager(resource_dirs);
    reader::read_artifact(&packager, &text)
        .with_context(|| format!("Failed to decode artifact '{}'", artifact.display()))
}
