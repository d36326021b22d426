//! # ppdpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared building blocks that know nothing about PPDs or the index format:
//!
//! - **`archive`**: The TAR bundle and the xz/gzip codecs.
//! - **`fs`**: Document discovery and resource lookup.
//!
//! The `pack` module composes these into the archive pipeline.
//!

/// Bundle building/reading and compression.
pub mod archive;
/// Document discovery and resource resolution.
pub mod fs;
