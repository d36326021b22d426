//! # ppdpack Cat Command
//!
//! File: cli/src/commands/cat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `ppdpack cat`: writes the original bytes of one driver file,
//! selected by its key, to stdout.
//!
use super::open_artifact;
use anyhow::Context;
use clap::Parser;
use ppdpack::core::config;
use ppdpack::core::error::Result;
use std::io::Write;
use std::path::PathBuf;

/// # Cat Arguments (`CatArgs`)
#[derive(Parser, Debug)]
pub struct CatArgs {
    /// Artifact produced by `ppdpack build`.
    pub artifact: PathBuf,

    /// Driver key, as printed in the first field of `ppdpack list`.
    pub key: String,

    /// Extra resource directory, searched before configured locations. Repeatable.
    #[arg(long = "resource-dir", value_name = "DIR")]
    pub resource_dirs: Vec<PathBuf>,
}

pub fn handle_cat(args: CatArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let index = open_artifact(&cfg, &args.artifact, &args.resource_dirs)?;
    let content = index.extract(&args.key)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&content)
        .and_then(|_| stdout.flush())
        .context("Failed to write document to stdout")?;
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_cat_args() {
        let args = CatArgs::try_parse_from(["cat", "a.archive", "HP LaserJet 4250"]).unwrap();
        assert_eq!(args.key, "HP LaserJet 4250");
        assert!(CatArgs::try_parse_from(["cat", "a.archive"]).is_err());
    }
}
