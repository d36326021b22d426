//! # ppdpack Resource Resolution (`common::fs::resources`)
//!
//! File: cli/src/common/fs/resources.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The artifact packager needs two text resources, the template and the
//! consumer-side support code. They are found by relative name in an explicit,
//! ordered list of search directories handed in by the caller: the first
//! directory holding a readable file wins.
//!
//! Resource names carry their own `ppdpack/` prefix, so a search directory is a
//! `share`-style root. Besides directories given on the command line or in the
//! configuration, an installed binary looks in:
//!
//! 1. the user data directory (`$XDG_DATA_HOME`, usually `~/.local/share`),
//! 2. the `share/` directory beside the binary's own directory
//!    (`/usr/local/bin/ppdpack` -> `/usr/local/share`),
//! 3. the crate's source `resources/` directory, which only exists on the
//!    machine that built the binary.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ppdpack::common::fs::resources::ResourceLocator;
//! use std::path::PathBuf;
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! let locator = ResourceLocator::new(vec![
//!     PathBuf::from("/usr/local/share"),
//!     PathBuf::from("/usr/share"),
//! ]);
//! let template = locator.read_to_string("ppdpack/ppdpack-archive.in")?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackError, PackResult};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source-tree directory holding the default template and support code.
pub fn bundled_resource_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources")
}

/// Runtime locations of an installed copy of the resources, in lookup order:
/// the user data directory, then `<prefix>/share` for a binary in `<prefix>/bin`.
pub fn installed_resource_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(base) = BaseDirs::new() {
        dirs.push(base.data_dir().to_path_buf());
    }
    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(prefix) = exe.parent().and_then(Path::parent) {
                dirs.push(prefix.join("share"));
            }
        }
        Err(e) => debug!("Cannot locate the running executable: {}", e),
    }
    dirs
}

/// Ordered list of directories searched for named resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLocator {
    search_paths: Vec<PathBuf>,
}

impl ResourceLocator {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// The search directories, in lookup order.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Reads `name` from the first search directory where it is readable.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` listing every directory tried when no candidate
    /// could be read.
    pub fn read_to_string(&self, name: &str) -> PackResult<String> {
        for dir in &self.search_paths {
            let candidate = dir.join(name);
            match fs::read_to_string(&candidate) {
                Ok(content) => {
                    debug!("Resolved resource '{}' at {}", name, candidate.display());
                    return Ok(content);
                }
                Err(e) => {
                    debug!("Resource candidate {} unusable: {}", candidate.display(), e);
                }
            }
        }
        Err(PackError::ResourceNotFound {
            name: name.to_string(),
            searched: self.search_paths.clone(),
        })
    }
}
