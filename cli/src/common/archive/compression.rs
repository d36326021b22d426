//! # ppdpack Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Compression and decompression of in-memory byte buffers, used for both
//! layers of the archive payload: once for the sealed tar bundle and once for the
//! serialized index that embeds it.
//!
//! ## Architecture
//!
//! - [`Codec`] picks the stream format. `xz` (LZMA2) is the default and gives the
//!   best ratio on large driver trees; `gzip` is faster and still available.
//! - [`Compressor`] pairs a codec with a level and is what the pipeline carries.
//! - [`decompress`] recognizes the format from the stream's magic bytes, so a
//!   reader never needs to know how an artifact was built.
//!
//! ## Usage
//!
//! ```rust
//! use ppdpack::common::archive::compression::{self, Codec, Compressor};
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! let data = b"*PPD-Adobe: \"4.3\"";
//! let compressed = Compressor::default().compress(data)?;
//! assert_eq!(compression::decompress(&compressed)?, data.to_vec());
//!
//! let gz = Compressor::new(Codec::Gzip, 9).compress(data)?;
//! assert_eq!(compression::decompress(&gz)?, data.to_vec());
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackError, PackResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;
use std::fmt;
use std::io::{Read, Write};
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

/// Highest level accepted by both codecs.
pub const MAX_LEVEL: u32 = 9;

const XZ_MAGIC: &[u8] = &[0xFD, b'7', b'z', b'X', b'Z', 0x00];
const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];

/// Stream format used for both payload layers.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Xz,
    Gzip,
}

impl Codec {
    /// Level used when none is configured. xz presets above 6 need several
    /// hundred MiB of encoder memory.
    pub fn default_level(self) -> u32 {
        match self {
            Codec::Xz => 6,
            Codec::Gzip => MAX_LEVEL,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Xz => write!(f, "xz"),
            Codec::Gzip => write!(f, "gzip"),
        }
    }
}

/// A codec and the level to run it at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compressor {
    pub codec: Codec,
    pub level: u32,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::with_codec(Codec::default())
    }
}

impl Compressor {
    /// `level` is clamped to `0..=MAX_LEVEL`.
    pub fn new(codec: Codec, level: u32) -> Self {
        Self {
            codec,
            level: level.min(MAX_LEVEL),
        }
    }

    /// `codec` at its default level.
    pub fn with_codec(codec: Codec) -> Self {
        Self::new(codec, codec.default_level())
    }

    /// Compresses `data` into one complete stream of the configured codec.
    ///
    /// Output depends only on the input, codec and level.
    pub fn compress(&self, data: &[u8]) -> PackResult<Vec<u8>> {
        match self.codec {
            Codec::Xz => compress_xz(data, self.level),
            Codec::Gzip => compress_gzip(data, self.level),
        }
    }
}

/// Compresses `data` into a complete xz stream at the given level (0..=9).
pub fn compress_xz(data: &[u8], level: u32) -> PackResult<Vec<u8>> {
    let mut encoder = XzEncoder::new(Vec::with_capacity(data.len() / 4), level.min(MAX_LEVEL));
    encoder
        .write_all(data)
        .map_err(|source| PackError::Compression {
            stage: "writing xz stream",
            source,
        })?;
    encoder.finish().map_err(|source| PackError::Compression {
        stage: "finishing xz stream",
        source,
    })
}

/// Compresses `data` into a complete gzip stream at the given level (0..=9).
///
/// The gzip header is written without a filename or modification time, so the
/// same input always produces the same output bytes.
pub fn compress_gzip(data: &[u8], level: u32) -> PackResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 2),
        Compression::new(level.min(MAX_LEVEL)),
    );
    encoder
        .write_all(data)
        .map_err(|source| PackError::Compression {
            stage: "writing gzip stream",
            source,
        })?;
    encoder.finish().map_err(|source| PackError::Compression {
        stage: "finishing gzip stream",
        source,
    })
}

/// Decompresses an xz or gzip stream, told apart by its magic bytes.
pub fn decompress(compressed: &[u8]) -> PackResult<Vec<u8>> {
    if compressed.starts_with(XZ_MAGIC) {
        read_all(XzDecoder::new(compressed), "reading xz stream")
    } else if compressed.starts_with(GZIP_MAGIC) {
        read_all(GzDecoder::new(compressed), "reading gzip stream")
    } else {
        Err(PackError::Compression {
            stage: "detecting stream format",
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "neither an xz nor a gzip stream",
            ),
        })
    }
}

fn read_all<R: Read>(mut decoder: R, stage: &'static str) -> PackResult<Vec<u8>> {
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|source| PackError::Compression { stage, source })?;
    Ok(out)
}
