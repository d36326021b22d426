//! # ppdpack
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Packs a directory tree of PPD printer-driver files into a single text
//! artifact that carries a name-indexed, doubly compressed archive of the
//! originals. A consumer can list drivers by decoding only the index and pull
//! out a single file on demand.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`core`] | Errors, configuration, templating |
//! | [`common`] | Bundle/compression and filesystem helpers |
//! | [`pack`] | The archive pipeline and the reader |
//!
//! The payload embedded in the artifact is
//! `base64(xz(cbor({ key: [path, description], ..., "ARCHIVE": xz(tar) })))`, with
//! gzip available in place of xz.
//!

pub mod common;
pub mod core;
pub mod pack;
