//! # ppdpack Template System
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The distributable artifact is a text template with two placeholders: one for
//! the consumer-side support code and one for the base64 payload. Rendering is
//! plain literal substitution, support code first and payload second. There are
//! no loops, conditionals or escaping rules.
//!
//! The inverse operation, `extract_payload`, recovers the payload from an
//! artifact rendered with the same template and support code. The `list` and
//! `cat` commands use it to read an artifact back.
//!
//! ## Examples
//!
//! ```rust
//! use ppdpack::core::templating::{Placeholders, Template};
//!
//! # fn main() -> ppdpack::core::error::PackResult<()> {
//! let template = Template::new(
//!     "#!/usr/bin/env python3\n@support_code@\nARCHIVE = \"@archive_b64@\"\n",
//!     Placeholders::default(),
//! )?;
//! let artifact = template.render("import zlib", "SGVsbG8=");
//! assert_eq!(template.extract_payload("import zlib", &artifact)?, "SGVsbG8=");
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{PackError, PackResult};
use tracing::debug;

/// Default marker replaced by the support code.
pub const DEFAULT_SUPPORT_PLACEHOLDER: &str = "@support_code@";
/// Default marker replaced by the base64 payload.
pub const DEFAULT_PAYLOAD_PLACEHOLDER: &str = "@archive_b64@";

/// The two literal markers substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub support_placeholder: String,
    pub payload_placeholder: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            support_placeholder: DEFAULT_SUPPORT_PLACEHOLDER.to_string(),
            payload_placeholder: DEFAULT_PAYLOAD_PLACEHOLDER.to_string(),
        }
    }
}

/// A loaded artifact template.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    placeholders: Placeholders,
}

impl Template {
    /// Wraps template text. The text must contain the payload placeholder,
    /// otherwise the rendered artifact would carry no archive at all.
    pub fn new(text: impl Into<String>, placeholders: Placeholders) -> PackResult<Self> {
        let text = text.into();
        if !text.contains(&placeholders.payload_placeholder) {
            return Err(PackError::Config(format!(
                "template does not contain the payload placeholder '{}'",
                placeholders.payload_placeholder
            )));
        }
        Ok(Self { text, placeholders })
    }

    /// Substitutes `support_code` and then `payload` into the template.
    pub fn render(&self, support_code: &str, payload: &str) -> String {
        let with_support = self
            .text
            .replace(&self.placeholders.support_placeholder, support_code);
        let rendered = with_support.replace(&self.placeholders.payload_placeholder, payload);
        debug!(
            "Rendered template: {} bytes in, {} bytes out",
            self.text.len(),
            rendered.len()
        );
        rendered
    }

    /// Returns the payload embedded in `artifact`.
    ///
    /// Every literal part of the template around the payload placeholder must
    /// appear unchanged in the artifact, and all payload occurrences must agree.
    pub fn extract_payload<'a>(
        &self,
        support_code: &str,
        artifact: &'a str,
    ) -> PackResult<&'a str> {
        let mismatch =
            || PackError::InvalidPayload("artifact does not match the template".to_string());

        let with_support = self
            .text
            .replace(&self.placeholders.support_placeholder, support_code);
        let parts: Vec<&str> = with_support
            .split(self.placeholders.payload_placeholder.as_str())
            .collect();
        let occurrences = parts.len() - 1;
        let literal_len: usize = parts.iter().map(|p| p.len()).sum();
        if occurrences == 0 || artifact.len() < literal_len {
            return Err(mismatch());
        }
        let payload_len = (artifact.len() - literal_len) / occurrences;

        let start = parts[0].len();
        let payload = artifact
            .get(start..start + payload_len)
            .ok_or_else(mismatch)?;
        if with_support.replace(&self.placeholders.payload_placeholder, payload) != artifact {
            return Err(mismatch());
        }
        Ok(payload)
    }
}
