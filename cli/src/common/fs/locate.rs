//! # ppdpack File Locator (`common::fs::locate`)
//!
//! File: cli/src/common/fs/locate.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Recursively walks a root directory and yields every file whose *name* matches
//! a glob pattern (default `*.ppd`), the first stage of the archive pipeline.
//!
//! ## Architecture
//!
//! - `find_files` returns a lazy `FoundFiles` iterator over absolute paths.
//! - The walk is sorted by file name at every level, so the yielded order is
//!   deterministic for a given tree. Callers must not assume anything stronger.
//! - Entries the walk cannot read (permissions, races with deletion) are logged
//!   at `warn` and skipped; they do not end the iteration.
//! - Symbolic links are not followed into directories, but a link whose name
//!   matches is yielded unless it points at a directory. Reading it later gives
//!   the target's bytes; a dangling link fails at that read.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ppdpack::common::fs::locate;
//! use std::path::Path;
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! for path in locate::find_files(Path::new("/usr/share/ppd"), "*.ppd")? {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackError, PackResult};
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Filename pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.ppd";

/// Lazy iterator over the files found by [`find_files`].
pub struct FoundFiles {
    walker: walkdir::IntoIter,
    matcher: GlobMatcher,
}

impl Iterator for FoundFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry_result in self.walker.by_ref() {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry during walk: {}", e);
                    continue;
                }
            };
            if !is_document_candidate(&entry) {
                continue;
            }
            if self.matcher.is_match(entry.file_name()) {
                debug!("Located document: {}", entry.path().display());
                return Some(entry.into_path());
            }
        }
        None
    }
}

fn is_document_candidate(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink() && !entry.path().is_dir()
}

/// Builds the filename matcher for `pattern`.
///
/// `*` does not cross path separators, but since only the file name is
/// tested this behaves like `fnmatch`.
pub fn build_matcher(pattern: &str) -> PackResult<GlobMatcher> {
    if pattern.is_empty() {
        return Err(PackError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| PackError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Yields every file under `directory` whose name matches `pattern`.
///
/// The directory is made absolute first so yielded paths are absolute too.
///
/// # Errors
///
/// - `InvalidPattern` if `pattern` is not a valid glob.
/// - `DocumentRead` if `directory` does not exist or is not a directory.
pub fn find_files(directory: &Path, pattern: &str) -> PackResult<FoundFiles> {
    let matcher = build_matcher(pattern)?;
    let root = std::path::absolute(directory).map_err(|source| PackError::DocumentRead {
        path: directory.to_path_buf(),
        source,
    })?;
    if !root.is_dir() {
        return Err(PackError::DocumentRead {
            path: root,
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "input root is not a readable directory",
            ),
        });
    }
    debug!(
        "Walking '{}' for files matching '{}'",
        root.display(),
        pattern
    );
    Ok(FoundFiles {
        walker: WalkDir::new(root).sort_by_file_name().into_iter(),
        matcher,
    })
}
