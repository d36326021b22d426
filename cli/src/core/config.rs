//! # ppdpack Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges and validates the settings that shape a build:
//! the document filename pattern, the compression codec and level, where the
//! template and support-code resources are searched for, and the template
//! placeholders.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.ppdpack.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `<config dir>/ppdpack/config.toml`
//! 3. Default values defined in the code
//!
//! Each file is read into a [`ConfigFile`] whose settings are all optional, so
//! "not set" and "set to the default value" stay distinguishable while merging.
//! The merged layer is then resolved into a [`Config`].
//!
//! Command-line flags are applied on top by the command handlers. Resource
//! search paths are `~`-expanded and followed by the installed resource
//! locations and the source-tree `resources/` directory.
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! pattern = "*.ppd"
//! codec = "xz"            # or "gzip"
//! compression_level = 6
//!
//! [resources]
//! search_paths = ["~/ppd-templates"]
//!
//! [template]
//! payload_placeholder = "@archive_b64@"
//! ```
//!
use crate::common::archive::compression::{Codec, Compressor, MAX_LEVEL};
use crate::common::fs::locate::DEFAULT_PATTERN;
use crate::common::fs::resources::{bundled_resource_dir, installed_resource_dirs, ResourceLocator};
use crate::core::error::{PackError, Result};
use crate::core::templating::{
    Placeholders, DEFAULT_PAYLOAD_PLACEHOLDER, DEFAULT_SUPPORT_PLACEHOLDER,
};
use crate::pack::packager::{Packager, DEFAULT_SUPPORT_RESOURCE, DEFAULT_TEMPLATE_RESOURCE};
use crate::pack::BuildOptions;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The resolved configuration used by the commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub resources: ResourcesConfig,
    pub template: Placeholders,
}

/// Which files go into the archive and how they are compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Filename glob matched against each file name.
    pub pattern: String,
    /// Codec for both compression layers.
    pub codec: Codec,
    /// Level (0-9) for both compression layers.
    pub compression_level: u32,
}

/// Where the template and support-code resources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcesConfig {
    /// Directories searched in order (can use ~). Will be expanded.
    pub search_paths: Vec<String>,
    /// Relative name of the template resource.
    pub template: String,
    /// Relative name of the support-code resource.
    pub support: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        let codec = Codec::default();
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            codec,
            compression_level: codec.default_level(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            template: DEFAULT_TEMPLATE_RESOURCE.to_string(),
            support: DEFAULT_SUPPORT_RESOURCE.to_string(),
        }
    }
}

/// One configuration file as written on disk. Unset keys stay `None`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub archive: ArchiveSection,
    #[serde(default)]
    pub resources: ResourcesSection,
    #[serde(default)]
    pub template: TemplateSection,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveSection {
    pub pattern: Option<String>,
    pub codec: Option<Codec>,
    pub compression_level: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResourcesSection {
    #[serde(default)]
    pub search_paths: Vec<String>,
    pub template: Option<String>,
    pub support: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplateSection {
    pub support_placeholder: Option<String>,
    pub payload_placeholder: Option<String>,
}

impl ConfigFile {
    /// Fills every unset value with its default. An unset level follows the
    /// chosen codec.
    pub fn resolve(self) -> Config {
        let codec = self.archive.codec.unwrap_or_default();
        Config {
            archive: ArchiveConfig {
                pattern: self
                    .archive
                    .pattern
                    .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
                codec,
                compression_level: self
                    .archive
                    .compression_level
                    .unwrap_or_else(|| codec.default_level()),
            },
            resources: ResourcesConfig {
                search_paths: self.resources.search_paths,
                template: self
                    .resources
                    .template
                    .unwrap_or_else(|| DEFAULT_TEMPLATE_RESOURCE.to_string()),
                support: self
                    .resources
                    .support
                    .unwrap_or_else(|| DEFAULT_SUPPORT_RESOURCE.to_string()),
            },
            template: Placeholders {
                support_placeholder: self
                    .template
                    .support_placeholder
                    .unwrap_or_else(|| DEFAULT_SUPPORT_PLACEHOLDER.to_string()),
                payload_placeholder: self
                    .template
                    .payload_placeholder
                    .unwrap_or_else(|| DEFAULT_PAYLOAD_PLACEHOLDER.to_string()),
            },
        }
    }
}

impl Config {
    /// The codec and level for both compression layers.
    pub fn compressor(&self) -> Compressor {
        Compressor::new(self.archive.codec, self.archive.compression_level)
    }

    /// Locate/index settings, with an optional pattern override.
    pub fn build_options(&self, pattern_override: Option<&str>) -> BuildOptions {
        BuildOptions {
            pattern: pattern_override
                .map(str::to_string)
                .unwrap_or_else(|| self.archive.pattern.clone()),
            compressor: self.compressor(),
        }
    }

    /// Resource search order: `extra_dirs` first, then configured paths, then
    /// the installed locations, then the source-tree resources.
    pub fn resource_locator(&self, extra_dirs: &[PathBuf]) -> ResourceLocator {
        let mut search_paths: Vec<PathBuf> = extra_dirs.to_vec();
        search_paths.extend(self.resources.search_paths.iter().map(PathBuf::from));
        search_paths.extend(installed_resource_dirs());
        search_paths.push(bundled_resource_dir());
        ResourceLocator::new(search_paths)
    }

    /// A packager wired to this configuration.
    pub fn packager(&self, extra_dirs: &[PathBuf]) -> Packager {
        Packager {
            resources: self.resource_locator(extra_dirs),
            template_name: self.resources.template.clone(),
            support_name: self.resources.support.clone(),
            placeholders: self.template.clone(),
            compressor: self.compressor(),
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".ppdpack.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config =
        merge_configs(user_config.unwrap_or_default(), project_config).resolve();
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("org", "ppdpack", "ppdpack") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Every value the project file sets wins over the user file.
/// Search paths are concatenated, project first.
fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> ConfigFile {
    let Some(project) = project else {
        return user;
    };
    ConfigFile {
        archive: ArchiveSection {
            pattern: project.archive.pattern.or(user.archive.pattern),
            codec: project.archive.codec.or(user.archive.codec),
            compression_level: project
                .archive
                .compression_level
                .or(user.archive.compression_level),
        },
        resources: ResourcesSection {
            search_paths: project
                .resources
                .search_paths
                .into_iter()
                .chain(user.resources.search_paths)
                .collect(),
            template: project.resources.template.or(user.resources.template),
            support: project.resources.support.or(user.resources.support),
        },
        template: TemplateSection {
            support_placeholder: project
                .template
                .support_placeholder
                .or(user.template.support_placeholder),
            payload_placeholder: project
                .template
                .payload_placeholder
                .or(user.template.payload_placeholder),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    for search_path in &mut config.resources.search_paths {
        *search_path = shellexpand::tilde(search_path).into_owned();
        debug!("Expanded resource search path: {}", search_path);
    }
}

pub fn validate_config(config: &Config) -> Result<()> {
    let invalid = |msg: String| anyhow!(PackError::Config(msg));

    if config.archive.pattern.trim().is_empty() {
        return Err(invalid("archive.pattern must not be empty".to_string()));
    }
    if config.archive.compression_level > MAX_LEVEL {
        return Err(invalid(format!(
            "archive.compression_level must be between 0 and {}, got {}",
            MAX_LEVEL, config.archive.compression_level
        )));
    }
    if config.resources.template.is_empty() || config.resources.support.is_empty() {
        return Err(invalid(
            "resources.template and resources.support must not be empty".to_string(),
        ));
    }
    let placeholders = &config.template;
    if placeholders.support_placeholder.is_empty() || placeholders.payload_placeholder.is_empty() {
        return Err(invalid("template placeholders must not be empty".to_string()));
    }
    if placeholders.support_placeholder == placeholders.payload_placeholder {
        return Err(invalid(
            "template.support_placeholder and template.payload_placeholder must differ"
                .to_string(),
        ));
    }
    for search_path in &config.resources.search_paths {
        let dir = Path::new(search_path);
        if !dir.is_dir() {
            warn!(
                "Configured resource search path '{}' is not a directory.",
                dir.display()
            );
        }
    }
    Ok(())
}
