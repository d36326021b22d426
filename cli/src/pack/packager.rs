//! # ppdpack Artifact Packager (`pack::packager`)
//!
//! File: cli/src/pack/packager.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Final pipeline stage. Given a complete [`Index`]:
//!
//! 1. serialize it to CBOR,
//! 2. compress the serialized bytes (the second compression layer),
//! 3. base64-encode the result,
//! 4. resolve the template and support-code resources through the configured
//!    search directories,
//! 5. substitute support code and payload into the template.
//!
//! Resources are resolved only after the payload is encoded, so a missing
//! template fails the run after the archive work was already done.
//!
use crate::common::archive::compression::Compressor;
use crate::common::fs::resources::ResourceLocator;
use crate::core::error::PackResult;
use crate::core::templating::{Placeholders, Template};
use crate::pack::index::Index;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

/// Default relative name of the artifact template resource.
pub const DEFAULT_TEMPLATE_RESOURCE: &str = "ppdpack/ppdpack-archive.in";
/// Default relative name of the support-code resource.
pub const DEFAULT_SUPPORT_RESOURCE: &str = "ppdpack/ppdpack_support.py";

/// `base64(compress(cbor(index)))`.
pub fn encode_payload(index: &Index, compressor: Compressor) -> PackResult<String> {
    let serialized = index.to_cbor()?;
    let compressed = compressor.compress(&serialized)?;
    debug!(
        "Serialized index: {} bytes, {} bytes compressed",
        serialized.len(),
        compressed.len()
    );
    Ok(STANDARD.encode(compressed))
}

/// The rendered, distributable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    text: String,
    payload: String,
}

impl Artifact {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The base64 payload substituted into the template.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Resource names, placeholders and compressor for packaging.
#[derive(Debug, Clone)]
pub struct Packager {
    pub resources: ResourceLocator,
    pub template_name: String,
    pub support_name: String,
    pub placeholders: Placeholders,
    pub compressor: Compressor,
}

impl Packager {
    /// A packager with default resource names and placeholders.
    pub fn new(resources: ResourceLocator) -> Self {
        Self {
            resources,
            template_name: DEFAULT_TEMPLATE_RESOURCE.to_string(),
            support_name: DEFAULT_SUPPORT_RESOURCE.to_string(),
            placeholders: Placeholders::default(),
            compressor: Compressor::default(),
        }
    }

    /// Loads the template resource.
    pub fn load_template(&self) -> PackResult<Template> {
        let text = self.resources.read_to_string(&self.template_name)?;
        Template::new(text, self.placeholders.clone())
    }

    /// Loads the support-code resource.
    pub fn load_support_code(&self) -> PackResult<String> {
        self.resources.read_to_string(&self.support_name)
    }

    /// Encodes `index` and renders it into the template.
    pub fn package(&self, index: &Index) -> PackResult<Artifact> {
        let payload = encode_payload(index, self.compressor)?;
        let template = self.load_template()?;
        let support_code = self.load_support_code()?;
        let text = template.render(&support_code, &payload);
        info!(
            "Packaged {} record(s): {} payload chars, {} bytes of artifact text",
            index.len(),
            payload.len(),
            text.len()
        );
        Ok(Artifact { text, payload })
    }
}
