//! # ppdpack List Command
//!
//! File: cli/src/commands/list.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `ppdpack list`: prints the description line of every driver in an
//! artifact, one per line, ordered by key. Only the outer payload layer is
//! decoded; the bundle stays compressed.
//!
use super::open_artifact;
use clap::Parser;
use ppdpack::core::config;
use ppdpack::core::error::Result;
use std::path::PathBuf;

/// # List Arguments (`ListArgs`)
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Artifact produced by `ppdpack build`.
    pub artifact: PathBuf,

    /// Extra resource directory, searched before configured locations. Repeatable.
    #[arg(long = "resource-dir", value_name = "DIR")]
    pub resource_dirs: Vec<PathBuf>,
}

pub fn handle_list(args: ListArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let index = open_artifact(&cfg, &args.artifact, &args.resource_dirs)?;
    for record in index.records().values() {
        println!("{}", record.description);
    }
    Ok(())
}
