//! # ppdpack Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`: building
//! driver trees on disk, writing template resources, and running the compiled
//! `ppdpack` binary in an isolated working directory.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// # Get ppdpack Command (`ppdpack_cmd`)
///
/// An `assert_cmd::Command` for the compiled `ppdpack` binary, running in
/// `workdir` with the user config and data directories redirected inside it so
/// no real configuration or installed resources leak into the test.
pub fn ppdpack_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ppdpack").expect("Failed to find ppdpack binary for testing");
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".xdg-config"))
        .env("XDG_DATA_HOME", workdir.join(".xdg-data"))
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `content` at `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Minimal PPD text for a model.
pub fn ppd(model: &str, manufacturer: &str) -> String {
    format!(
        "*PPD-Adobe: \"4.3\"\n\
         *LanguageVersion: English\n\
         *Manufacturer: \"{manufacturer}\"\n\
         *ModelName: \"{model}\"\n\
         *NickName: \"{model}, 1.0\"\n\
         *1284DeviceID: \"MFG:{manufacturer};MDL:{model};\"\n"
    )
}

/// The CUPS driver line `PpdParser` produces for [`ppd`].
pub fn ppd_description(model: &str, manufacturer: &str) -> String {
    format!(
        "\"{model}\" en \"{manufacturer}\" \"{model}, 1.0\" \"MFG:{manufacturer};MDL:{model};\""
    )
}

/// Whether a `python3` interpreter can be run.
pub fn python3_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Writes a resource directory with the default resource names.
pub fn write_resources(root: &Path, template: &str, support: &str) {
    write_file(root, "ppdpack/ppdpack-archive.in", template.as_bytes());
    write_file(root, "ppdpack/ppdpack_support.py", support.as_bytes());
}
