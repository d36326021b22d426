//! # ppdpack Build Command
//!
//! File: cli/src/commands/build.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `ppdpack build`: runs the whole archive pipeline over a directory
//! and writes the resulting artifact to a file or to stdout.
//!
//! ## Examples
//!
//! ```bash
//! # Pack every *.ppd under ./drivers into drivers-archive
//! ppdpack build ./drivers -o drivers-archive
//!
//! # Use a custom template directory and a different pattern
//! ppdpack build ./drivers --pattern '*.PPD' --resource-dir ./my-templates
//! ```
//!
use anyhow::Context;
use clap::Parser;
use ppdpack::core::config;
use ppdpack::core::error::Result;
use ppdpack::pack::{self, document::PpdParser};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// # Build Arguments (`BuildArgs`)
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory to search recursively for driver files.
    pub directory: PathBuf,

    /// Write the artifact here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Filename pattern of driver files (overrides the configured one).
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Extra resource directory, searched before configured locations. Repeatable.
    #[arg(long = "resource-dir", value_name = "DIR")]
    pub resource_dirs: Vec<PathBuf>,
}

/// # Handle Build Command (`handle_build`)
///
/// Loads configuration, builds the artifact, then writes it out. Nothing is
/// written unless the whole pipeline succeeded.
pub fn handle_build(args: BuildArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let options = cfg.build_options(args.pattern.as_deref());
    let packager = cfg.packager(&args.resource_dirs);

    let artifact = pack::create_archive(&args.directory, &options, &PpdParser, &packager)
        .with_context(|| {
            format!(
                "Failed to build archive from '{}'",
                args.directory.display()
            )
        })?;

    match &args.output {
        Some(path) => {
            fs::write(path, artifact.text())
                .with_context(|| format!("Failed to write artifact to '{}'", path.display()))?;
            info!("Wrote artifact to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(artifact.text().as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write artifact to stdout")?;
        }
    }
    Ok(())
}
