//! # ppdpack Archive Pipeline (`pack`)
//!
//! File: cli/src/pack/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The pipeline that turns a directory of PPD files into one indexed,
//! self-contained text artifact:
//!
//! ```text
//! locate ──▶ read + bundle + parse ──▶ seal + compress ──▶ cbor + compress + base64 ──▶ template
//!  (locate)        (indexer)              (indexer)             (packager)            (packager)
//! ```
//!
//! Every stage returns `PackResult`. The first error stops the run and no
//! artifact is produced.
//!
//! ## Submodules
//!
//! - **`document`**: The `DocumentParser` seam and the default `PpdParser`.
//! - **`index`**: The `Index` type and its CBOR wire format.
//! - **`indexer`**: Reads documents, fills the bundle, builds the index.
//! - **`packager`**: Encodes the index and renders the artifact.
//! - **`reader`**: Decodes payloads and extracts documents again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ppdpack::common::fs::resources::ResourceLocator;
//! use ppdpack::pack::{self, document::PpdParser, packager::Packager, BuildOptions};
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! let packager = Packager::new(ResourceLocator::new(vec![PathBuf::from("/usr/share")]));
//! let artifact = pack::create_archive(
//!     Path::new("/usr/share/ppd/vendor"),
//!     &BuildOptions::default(),
//!     &PpdParser,
//!     &packager,
//! )?;
//! println!("{}", artifact.text());
//! # Ok(())
//! # }
//! ```
//!
pub mod document;
pub mod index;
pub mod indexer;
pub mod packager;
pub mod reader;

use crate::common::archive::compression::Compressor;
use crate::common::fs::locate::{self, DEFAULT_PATTERN};
use crate::core::error::{PackError, PackResult};
use document::DocumentParser;
use index::Index;
use packager::{Artifact, Packager};
use std::path::Path;
use tracing::info;

/// Settings for the locate/index/bundle stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Filename glob selecting documents.
    pub pattern: String,
    /// Codec and level for the bundle layer.
    pub compressor: Compressor,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            compressor: Compressor::default(),
        }
    }
}

/// Locates, reads, bundles and indexes every matching document under `root`.
pub fn build_index_from_dir<P>(root: &Path, options: &BuildOptions, parser: &P) -> PackResult<Index>
where
    P: DocumentParser + ?Sized,
{
    let root = std::path::absolute(root).map_err(|source| PackError::DocumentRead {
        path: root.to_path_buf(),
        source,
    })?;
    let paths = locate::find_files(&root, &options.pattern)?;
    indexer::build_index(&root, paths, parser, options.compressor)
}

/// Runs the whole pipeline and returns the rendered artifact.
pub fn create_archive<P>(
    root: &Path,
    options: &BuildOptions,
    parser: &P,
    packager: &Packager,
) -> PackResult<Artifact>
where
    P: DocumentParser + ?Sized,
{
    info!("Building archive from '{}'", root.display());
    let index = build_index_from_dir(root, options, parser)?;
    packager.package(&index)
}
