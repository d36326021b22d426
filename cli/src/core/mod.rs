//! # ppdpack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by the pipeline and the CLI:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and result aliases
//! - `templating`: Placeholder substitution for the artifact template
//!
pub mod config;
pub mod error;
pub mod templating;
