//! # ppdpack TAR Bundle Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module builds and reads the document *bundle*: a plain TAR stream that
//! holds the raw bytes of every located document under its relative path. The
//! bundle is the inner layer of the archive payload and is compressed on its own
//! before being stored in the index.
//!
//! ## Architecture
//!
//! - `BundleWriter` owns an in-memory `tar::Builder` for the lifetime of one build
//!   and accepts `append` calls in traversal order.
//! - `seal` consumes the writer, finishing the TAR stream, and returns a
//!   `SealedBundle`. Since the writer is moved, nothing can be appended afterwards.
//! - `SealedBundle::compress` produces the compressed blob stored in the index.
//! - `read_bundle_entries` is the reverse operation used by the reader side.
//!
//! Entry headers are deterministic (mode `0o644`, mtime 0, uid/gid 0): only the
//! path and the content of each entry carry information.
//!
//! ## Usage
//!
//! ```rust
//! use ppdpack::common::archive::tar::{read_bundle_entries, BundleWriter};
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! let mut bundle = BundleWriter::new();
//! bundle.append("hp/laserjet.ppd", b"*PPD-Adobe: \"4.3\"")?;
//! let sealed = bundle.seal()?;
//!
//! let entries = read_bundle_entries(sealed.as_bytes())?;
//! assert_eq!(entries["hp/laserjet.ppd"], b"*PPD-Adobe: \"4.3\"");
//! # Ok(())
//! # }
//! ```
//!
use crate::common::archive::compression::Compressor;
use crate::core::error::{PackError, PackResult};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::debug;

/// Mode recorded for every bundle entry.
const ENTRY_MODE: u32 = 0o644;

/// Accumulates raw document bytes into an in-memory TAR stream.
pub struct BundleWriter {
    builder: tar::Builder<Vec<u8>>,
    entries: usize,
}

impl BundleWriter {
    /// Opens an empty bundle.
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
            entries: 0,
        }
    }

    /// Appends one regular-file entry at `relative_path` holding `data`.
    ///
    /// Paths longer than the classic 100-byte TAR field are written with GNU
    /// long-name records by the `tar` crate.
    pub fn append(&mut self, relative_path: &str, data: &[u8]) -> PackResult<()> {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);

        self.builder
            .append_data(&mut header, relative_path, data)
            .map_err(|source| PackError::Compression {
                stage: "appending a bundle entry",
                source,
            })?;
        self.entries += 1;
        debug!(
            "Bundled '{}' ({} bytes, entry #{})",
            relative_path,
            data.len(),
            self.entries
        );
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// True if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Writes the closing TAR records and returns the finished bundle.
    pub fn seal(self) -> PackResult<SealedBundle> {
        let entries = self.entries;
        let bytes = self
            .builder
            .into_inner()
            .map_err(|source| PackError::Compression {
                stage: "sealing the bundle",
                source,
            })?;
        debug!("Sealed bundle: {} entries, {} bytes", entries, bytes.len());
        Ok(SealedBundle { bytes, entries })
    }
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished, immutable TAR bundle.
#[derive(Debug, Clone)]
pub struct SealedBundle {
    bytes: Vec<u8>,
    entries: usize,
}

impl SealedBundle {
    /// Raw TAR bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of entries in the bundle.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Compresses the TAR stream into a self-contained blob.
    pub fn compress(&self, compressor: Compressor) -> PackResult<Vec<u8>> {
        compressor.compress(&self.bytes)
    }
}

/// Reads every regular-file entry of an uncompressed bundle, keyed by path.
///
/// A path appearing twice keeps the content of its last entry, matching how
/// `tar -x` would leave the file on disk.
pub fn read_bundle_entries(bundle: &[u8]) -> PackResult<BTreeMap<String, Vec<u8>>> {
    let invalid = |e: std::io::Error| PackError::InvalidPayload(format!("bad bundle: {}", e));

    let mut archive = tar::Archive::new(bundle);
    let mut entries = BTreeMap::new();
    for entry_result in archive.entries().map_err(invalid)? {
        let mut entry = entry_result.map_err(invalid)?;
        if entry.header().entry_type() != tar::EntryType::Regular {
            continue;
        }
        let path = entry
            .path()
            .map_err(invalid)?
            .to_string_lossy()
            .replace('\\', "/");
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(invalid)?;
        entries.insert(path, data);
    }
    Ok(entries)
}
