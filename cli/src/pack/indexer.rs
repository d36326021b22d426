//! # ppdpack Document Indexer and Archive Builder (`pack::indexer`)
//!
//! File: cli/src/pack/indexer.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns a sequence of located document paths into an [`Index`]. For every path,
//! in the order given:
//!
//! 1. Read the whole file (`DocumentRead` on failure).
//! 2. Append the raw bytes to the bundle under the document's relative path.
//! 3. Parse it (`MalformedDocument` on failure, `ReservedKey` for `ARCHIVE`).
//! 4. Insert `key -> (relative path, description)`; a repeated key replaces the
//!    earlier record.
//!
//! The first error ends the build and everything accumulated so far, the open
//! bundle included, is dropped. Once all paths are consumed the bundle is
//! sealed, compressed and attached to the index.
//!
use crate::common::archive::compression::Compressor;
use crate::common::archive::tar::BundleWriter;
use crate::core::error::{PackError, PackResult};
use crate::pack::document::DocumentParser;
use crate::pack::index::{DocumentRecord, Index, ARCHIVE_KEY};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Path of `path` inside the bundle, `/`-separated with no leading separator.
///
/// Paths under `root` are made relative to it. Anything else keeps its full
/// path minus a single leading separator.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let raw = match path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => {
            let full = path.to_string_lossy();
            full.strip_prefix(std::path::MAIN_SEPARATOR)
                .unwrap_or(&*full)
                .to_string()
        }
    };
    raw.replace('\\', "/")
}

/// Reads, bundles and parses every path, then seals the bundle into the index.
///
/// `paths` is consumed lazily in iteration order; that order decides which
/// record survives a key collision.
pub fn build_index<I, P>(
    root: &Path,
    paths: I,
    parser: &P,
    compressor: Compressor,
) -> PackResult<Index>
where
    I: IntoIterator<Item = PathBuf>,
    P: DocumentParser + ?Sized,
{
    let mut bundle = BundleWriter::new();
    let mut records: BTreeMap<String, DocumentRecord> = BTreeMap::new();

    for path in paths {
        let content = fs::read(&path).map_err(|source| PackError::DocumentRead {
            path: path.clone(),
            source,
        })?;
        let relative = relative_path(root, &path);
        bundle.append(&relative, &content)?;

        let parsed = parser
            .parse(&content)
            .map_err(|e| PackError::MalformedDocument {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if parsed.key == ARCHIVE_KEY {
            return Err(PackError::ReservedKey { path });
        }

        let record = DocumentRecord {
            relative_path: relative,
            description: parsed.description,
        };
        if let Some(previous) = records.insert(parsed.key.clone(), record) {
            debug!(
                "Key '{}' from '{}' replaces the record from '{}'",
                parsed.key,
                path.display(),
                previous.relative_path
            );
        }
    }

    let bundled = bundle.len();
    let sealed = bundle.seal()?;
    let archive = sealed.compress(compressor)?;
    info!(
        "Indexed {} document(s) into {} record(s); bundle {} -> {} bytes ({})",
        bundled,
        records.len(),
        sealed.as_bytes().len(),
        archive.len(),
        compressor.codec
    );
    Index::new(records, archive)
}
