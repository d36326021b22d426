//! # ppdpack Archive Reader (`pack::reader`)
//!
//! File: cli/src/pack/reader.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The consumer side of the payload. `decode_payload` undoes the packager's
//! base64, decompression and CBOR steps and yields the [`Index`]. Listing drivers only
//! needs that outer layer; the compressed bundle stays untouched until a
//! document is actually requested through [`Index::extract`].
//!
use crate::common::archive::{compression, tar::read_bundle_entries};
use crate::core::error::{PackError, PackResult};
use crate::pack::index::Index;
use crate::pack::packager::Packager;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;
use tracing::debug;

/// Decodes `base64(compress(cbor(index)))` back into an index.
///
/// The codec is recognized from the stream itself.
pub fn decode_payload(payload: &str) -> PackResult<Index> {
    let compressed = STANDARD
        .decode(payload.trim())
        .map_err(|e| PackError::InvalidPayload(format!("bad base64: {}", e)))?;
    let serialized = compression::decompress(&compressed)?;
    debug!(
        "Decoded payload: {} base64 chars -> {} bytes of index",
        payload.len(),
        serialized.len()
    );
    Index::from_cbor(&serialized)
}

/// Recovers the index from artifact text rendered by `packager`.
///
/// The same template and support code must still be resolvable, since their
/// literal text is what delimits the payload.
pub fn read_artifact(packager: &Packager, artifact: &str) -> PackResult<Index> {
    let template = packager.load_template()?;
    let support_code = packager.load_support_code()?;
    let payload = template.extract_payload(&support_code, artifact)?;
    decode_payload(payload)
}

impl Index {
    /// Decompresses the bundle and returns every entry keyed by relative path.
    pub fn bundle_entries(&self) -> PackResult<BTreeMap<String, Vec<u8>>> {
        let bundle = compression::decompress(self.archive())?;
        read_bundle_entries(&bundle)
    }

    /// Original bytes of the document recorded under `key`.
    pub fn extract(&self, key: &str) -> PackResult<Vec<u8>> {
        let record = self.lookup(key).ok_or_else(|| PackError::RecordNotFound {
            key: key.to_string(),
        })?;
        let mut entries = self.bundle_entries()?;
        entries.remove(&record.relative_path).ok_or_else(|| {
            PackError::InvalidPayload(format!(
                "record '{}' points at '{}', which is missing from the bundle",
                key, record.relative_path
            ))
        })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::compression::{Codec, Compressor};
    use crate::common::archive::tar::BundleWriter;
    use crate::pack::index::DocumentRecord;
    use crate::pack::packager::encode_payload;

    fn index_with_bundle() -> Index {
        let mut bundle = BundleWriter::new();
        bundle.append("hp/lj.ppd", b"*PPD-Adobe: \"4.3\"\n").unwrap();
        let archive = bundle.seal().unwrap().compress(Compressor::default()).unwrap();

        let mut records = BTreeMap::new();
        records.insert(
            "LaserJet".to_string(),
            DocumentRecord {
                relative_path: "hp/lj.ppd".into(),
                description: "\"LaserJet\" en \"HP\" \"LaserJet\" \"\"".into(),
            },
        );
        records.insert(
            "Dangling".to_string(),
            DocumentRecord {
                relative_path: "missing.ppd".into(),
                description: "gone".into(),
            },
        );
        Index::new(records, archive).unwrap()
    }

    #[test]
    fn test_decode_and_extract() -> PackResult<()> {
        let payload = encode_payload(&index_with_bundle(), Compressor::default())?;
        let index = decode_payload(&format!("{}\n", payload))?;
        assert_eq!(index.extract("LaserJet")?, b"*PPD-Adobe: \"4.3\"\n");
        assert_eq!(index.bundle_entries()?.len(), 1);

        let gzip = encode_payload(&index_with_bundle(), Compressor::with_codec(Codec::Gzip))?;
        assert_ne!(gzip, payload);
        assert_eq!(decode_payload(&gzip)?, index);
        Ok(())
    }

    #[test]
    fn test_extract_errors() {
        let index = index_with_bundle();
        assert!(matches!(
            index.extract("Nope"),
            Err(PackError::RecordNotFound { .. })
        ));
        assert!(matches!(
            index.extract("Dangling"),
            Err(PackError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            decode_payload("not base64 !!!"),
            Err(PackError::InvalidPayload(_))
        ));
        // Valid base64, not a compressed stream.
        assert!(matches!(
            decode_payload("aGVsbG8="),
            Err(PackError::Compression { .. })
        ));
    }
}
