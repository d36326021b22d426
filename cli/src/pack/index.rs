//! # ppdpack Archive Index (`pack::index`)
//!
//! File: cli/src/pack/index.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `Index` maps each driver key to the relative path of its document inside the
//! bundle and its description, and carries the compressed bundle itself.
//!
//! In memory the compressed bundle is a separate field, so no document key can
//! ever shadow it. Only on the wire does it share a map with the records, under
//! the reserved key `ARCHIVE`:
//!
//! ```text
//! { "<key>": ["<relative path>", "<description>"], ..., "ARCHIVE": h'<xz or gzip bytes>' }
//! ```
//!
//! Records are kept in a `BTreeMap`, so the serialized map is ordered by key and
//! identical inputs always serialize to identical bytes.
//!
use crate::core::error::{PackError, PackResult};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Wire key holding the compressed bundle. Never valid as a document key.
pub const ARCHIVE_KEY: &str = "ARCHIVE";

/// Where a document lives in the bundle and how it describes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub relative_path: String,
    pub description: String,
}

/// The archive index: document records plus the compressed bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    records: BTreeMap<String, DocumentRecord>,
    archive: Vec<u8>,
}

impl Index {
    /// Assembles an index from records and a compressed bundle.
    ///
    /// # Errors
    ///
    /// `Serialization` if a record uses the reserved `ARCHIVE` key.
    pub fn new(records: BTreeMap<String, DocumentRecord>, archive: Vec<u8>) -> PackResult<Self> {
        if records.contains_key(ARCHIVE_KEY) {
            return Err(PackError::Serialization(format!(
                "record key '{}' is reserved",
                ARCHIVE_KEY
            )));
        }
        Ok(Self { records, archive })
    }

    pub fn records(&self) -> &BTreeMap<String, DocumentRecord> {
        &self.records
    }

    /// The compressed TAR bundle.
    pub fn archive(&self) -> &[u8] {
        &self.archive
    }

    pub fn lookup(&self, key: &str) -> Option<&DocumentRecord> {
        self.records.get(key)
    }

    /// Number of document records (the archive entry is not counted).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the index to CBOR.
    pub fn to_cbor(&self) -> PackResult<Vec<u8>> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(self, &mut out)
            .map_err(|e| PackError::Serialization(e.to_string()))?;
        Ok(out)
    }

    /// Parses an index from CBOR.
    pub fn from_cbor(bytes: &[u8]) -> PackResult<Self> {
        ciborium::de::from_reader(bytes).map_err(|e| PackError::InvalidPayload(e.to_string()))
    }
}

struct ArchiveBytes<'a>(&'a [u8]);

impl Serialize for ArchiveBytes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len() + 1))?;
        for (key, record) in &self.records {
            map.serialize_entry(
                key,
                &(record.relative_path.as_str(), record.description.as_str()),
            )?;
        }
        map.serialize_entry(ARCHIVE_KEY, &ArchiveBytes(&self.archive))?;
        map.end()
    }
}

/// One value of the wire map: a record pair or the archive byte string.
enum WireValue {
    Record(DocumentRecord),
    Archive(Vec<u8>),
}

struct WireValueVisitor;

impl<'de> Visitor<'de> for WireValueVisitor {
    type Value = WireValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a [path, description] pair or a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<WireValue, E> {
        Ok(WireValue::Archive(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<WireValue, E> {
        Ok(WireValue::Archive(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WireValue, A::Error> {
        let relative_path: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let description: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(3, &self));
        }
        Ok(WireValue::Record(DocumentRecord {
            relative_path,
            description,
        }))
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireValueVisitor)
    }
}

struct IndexVisitor;

impl<'de> Visitor<'de> for IndexVisitor {
    type Value = Index;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an archive index map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Index, A::Error> {
        let mut records = BTreeMap::new();
        let mut archive = None;
        while let Some((key, value)) = map.next_entry::<String, WireValue>()? {
            match (key.as_str() == ARCHIVE_KEY, value) {
                (true, WireValue::Archive(bytes)) => {
                    if archive.replace(bytes).is_some() {
                        return Err(de::Error::duplicate_field(ARCHIVE_KEY));
                    }
                }
                (false, WireValue::Record(record)) => {
                    records.insert(key, record);
                }
                (true, WireValue::Record(_)) => {
                    return Err(de::Error::custom("ARCHIVE must hold a byte string"));
                }
                (false, WireValue::Archive(_)) => {
                    return Err(de::Error::custom(format!(
                        "record '{}' holds a byte string instead of a pair",
                        key
                    )));
                }
            }
        }
        let archive = archive.ok_or_else(|| de::Error::missing_field(ARCHIVE_KEY))?;
        Ok(Index { records, archive })
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexVisitor)
    }
}
