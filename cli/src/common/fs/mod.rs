//! # ppdpack Filesystem Utilities Module (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers used by the pipeline:
//!
//! - **`locate`**: Recursive, pattern-filtered discovery of input documents.
//! - **`resources`**: Lookup of named text resources (template, support code)
//!   across an ordered list of search directories.
//!

pub mod locate;
pub mod resources;
