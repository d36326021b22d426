//! # ppdpack Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Archive-related building blocks for the payload:
//!
//! - **`tar`**: The document bundle. Raw document bytes are written into an
//!   in-memory TAR stream under their relative paths, then sealed.
//! - **`compression`**: xz (default) and gzip codecs for byte buffers, applied
//!   to the sealed bundle and again to the serialized index.
//!

pub mod compression;
pub mod tar;
