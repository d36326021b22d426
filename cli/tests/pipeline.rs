//! # ppdpack Pipeline Integration Tests
//!
//! File: cli/tests/pipeline.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Drives the library end to end: locate, index, bundle, package, and decode
//! again, checking the archive's observable guarantees.
//!

mod common;
use common::*;

use ppdpack::common::archive::compression::Compressor;
use ppdpack::common::fs::resources::ResourceLocator;
use ppdpack::core::error::PackError;
use ppdpack::pack::document::{ParseError, ParsedDocument, PpdParser};
use ppdpack::pack::packager::Packager;
use ppdpack::pack::{self, indexer, reader, BuildOptions};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Test documents are `key|description`.
fn pipe_parser(content: &[u8]) -> Result<ParsedDocument, ParseError> {
    let text = std::str::from_utf8(content).map_err(|e| ParseError(e.to_string()))?;
    let (key, description) = text
        .split_once('|')
        .ok_or_else(|| ParseError("missing '|'".to_string()))?;
    Ok(ParsedDocument {
        key: key.to_string(),
        description: description.to_string(),
    })
}

fn doc_options() -> BuildOptions {
    BuildOptions {
        pattern: "*.doc".to_string(),
        ..Default::default()
    }
}

fn packager_for(dir: &Path) -> Packager {
    Packager::new(ResourceLocator::new(vec![dir.to_path_buf()]))
}

const TEMPLATE: &str = "#!/bin/sh\n# header\n@support_code@\nPAYLOAD='@archive_b64@'\n# footer\n";
const SUPPORT: &str = "decode() { base64 -d; }";

#[test]
fn test_end_to_end_example() {
    let input = tempdir().unwrap();
    let resources = tempdir().unwrap();
    write_file(input.path(), "a.doc", b"Alice|Alice driver");
    write_file(input.path(), "sub/b.doc", b"Bob|Bob driver");
    write_file(input.path(), "sub/ignored.txt", b"Carol|not matched");
    write_resources(resources.path(), TEMPLATE, SUPPORT);

    let artifact = pack::create_archive(
        input.path(),
        &doc_options(),
        &pipe_parser,
        &packager_for(resources.path()),
    )
    .unwrap();

    let text = artifact.text();
    assert!(text.starts_with("#!/bin/sh\n# header\ndecode() { base64 -d; }\nPAYLOAD='"));
    assert!(text.ends_with("'\n# footer\n"));
    assert!(!artifact.payload().is_empty());
    assert!(!text.contains("@archive_b64@") && !text.contains("@support_code@"));

    let index = reader::decode_payload(artifact.payload()).unwrap();
    assert_eq!(index.len(), 2);
    let alice = index.lookup("Alice").unwrap();
    assert_eq!(
        (alice.relative_path.as_str(), alice.description.as_str()),
        ("a.doc", "Alice driver")
    );
    let bob = index.lookup("Bob").unwrap();
    assert_eq!(
        (bob.relative_path.as_str(), bob.description.as_str()),
        ("sub/b.doc", "Bob driver")
    );

    let entries = index.bundle_entries().unwrap();
    assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a.doc", "sub/b.doc"]);
    assert_eq!(entries["a.doc"], b"Alice|Alice driver");
    assert_eq!(entries["sub/b.doc"], b"Bob|Bob driver");

    // Reading back through the template yields the same index.
    let reread = reader::read_artifact(&packager_for(resources.path()), text).unwrap();
    assert_eq!(reread, index);
}

#[test]
fn test_round_trip_many_documents() {
    let input = tempdir().unwrap();
    let mut originals = BTreeMap::new();
    for i in 0..25 {
        let rel = format!("vendor{}/model-{:02}.doc", i % 4, i);
        let mut content = format!("Model {}|Driver number {}", i, i).into_bytes();
        content.extend((0..=255u8).cycle().skip(i).take(300));
        write_file(input.path(), &rel, &content);
        originals.insert(rel, content);
    }

    let parser = |content: &[u8]| -> Result<ParsedDocument, ParseError> {
        let end = content.iter().position(|&b| b == b'|').unwrap_or(content.len());
        Ok(ParsedDocument {
            key: String::from_utf8_lossy(&content[..end]).into_owned(),
            description: "synthetic".to_string(),
        })
    };
    let index = pack::build_index_from_dir(input.path(), &doc_options(), &parser).unwrap();
    let payload = pack::packager::encode_payload(&index, Compressor::default()).unwrap();
    let decoded = reader::decode_payload(&payload).unwrap();

    assert_eq!(decoded.len(), 25);
    assert_eq!(decoded.bundle_entries().unwrap(), originals);
    for (key, record) in decoded.records() {
        assert_eq!(decoded.extract(key).unwrap(), originals[&record.relative_path]);
    }
}

#[test]
fn test_key_collision_follows_traversal_order() {
    let input = tempdir().unwrap();
    let first = write_file(input.path(), "one.doc", b"Shared|first");
    let middle = write_file(input.path(), "two.doc", b"Other|other");
    let last = write_file(input.path(), "three.doc", b"Shared|last");

    // Deliberately not in lexical order.
    let ordered = vec![last.clone(), middle.clone(), first.clone()];
    let index =
        indexer::build_index(input.path(), ordered, &pipe_parser, Compressor::default()).unwrap();
    assert_eq!(index.len(), 2);
    let shared = index.lookup("Shared").unwrap();
    assert_eq!(shared.relative_path, "one.doc");
    assert_eq!(shared.description, "first");

    let in_order = vec![first, middle, last];
    let index =
        indexer::build_index(input.path(), in_order, &pipe_parser, Compressor::default()).unwrap();
    assert_eq!(index.lookup("Shared").unwrap().relative_path, "three.doc");
}

#[test]
fn test_malformed_document_fails_whole_build() {
    let input = tempdir().unwrap();
    let resources = tempdir().unwrap();
    write_resources(resources.path(), TEMPLATE, SUPPORT);
    for i in 0..5 {
        write_file(input.path(), &format!("ok{}.doc", i), format!("K{}|fine", i).as_bytes());
    }
    let bad = write_file(input.path(), "nested/broken.doc", b"no separator");

    let err = pack::create_archive(
        input.path(),
        &doc_options(),
        &pipe_parser,
        &packager_for(resources.path()),
    )
    .unwrap_err();

    assert!(err.is_build_aborted());
    match err {
        PackError::MalformedDocument { path, .. } => {
            assert_eq!(fs::canonicalize(path).unwrap(), fs::canonicalize(bad).unwrap())
        }
        other => panic!("expected MalformedDocument, got {:?}", other),
    }
}

#[test]
fn test_resource_search_order() {
    let input = tempdir().unwrap();
    write_file(input.path(), "a.doc", b"A|a");
    let empty: Vec<_> = (0..3).map(|_| tempdir().unwrap()).collect();
    let holder = tempdir().unwrap();
    write_resources(holder.path(), "T[@support_code@|@archive_b64@]", "S");

    let mut search: Vec<_> = empty.iter().map(|d| d.path().to_path_buf()).collect();
    search.push(holder.path().to_path_buf());
    let packager = Packager::new(ResourceLocator::new(search.clone()));
    let artifact =
        pack::create_archive(input.path(), &doc_options(), &pipe_parser, &packager).unwrap();
    assert_eq!(artifact.text(), format!("T[S|{}]", artifact.payload()));

    search.pop();
    let packager = Packager::new(ResourceLocator::new(search));
    let err =
        pack::create_archive(input.path(), &doc_options(), &pipe_parser, &packager).unwrap_err();
    assert!(matches!(
        err,
        PackError::ResourceNotFound { ref searched, .. } if searched.len() == 3
    ));
}

#[test]
fn test_rebuild_yields_same_index() {
    let input = tempdir().unwrap();
    write_file(input.path(), "hp/lj4250.ppd", ppd("HP LaserJet 4250", "HP").as_bytes());
    write_file(input.path(), "epson/st.ppd", ppd("Epson Stylus", "Epson").as_bytes());
    let options = BuildOptions::default();

    let first = pack::build_index_from_dir(input.path(), &options, &PpdParser).unwrap();
    let second = pack::build_index_from_dir(input.path(), &options, &PpdParser).unwrap();
    assert_eq!(first.records(), second.records());
    assert_eq!(first.bundle_entries().unwrap(), second.bundle_entries().unwrap());
    assert_eq!(
        first.lookup("HP LaserJet 4250").unwrap().description,
        ppd_description("HP LaserJet 4250", "HP")
    );

    // Same records assembled in a different traversal order decode identically.
    let mut paths = vec![
        input.path().join("hp/lj4250.ppd"),
        input.path().join("epson/st.ppd"),
    ];
    let xz = Compressor::default();
    let forward = indexer::build_index(input.path(), paths.clone(), &PpdParser, xz).unwrap();
    paths.reverse();
    let backward = indexer::build_index(input.path(), paths, &PpdParser, xz).unwrap();
    assert_eq!(forward.records(), backward.records());
    assert_eq!(forward.bundle_entries().unwrap(), backward.bundle_entries().unwrap());
}

#[test]
fn test_reserved_key_is_rejected() {
    let input = tempdir().unwrap();
    let path = write_file(input.path(), "evil.doc", b"ARCHIVE|collides");
    let err = pack::build_index_from_dir(input.path(), &doc_options(), &pipe_parser).unwrap_err();
    match err {
        PackError::ReservedKey { path: reported } => {
            assert_eq!(fs::canonicalize(reported).unwrap(), fs::canonicalize(path).unwrap())
        }
        other => panic!("expected ReservedKey, got {:?}", other),
    }
}

#[test]
fn test_bundled_template_renders() {
    let input = tempdir().unwrap();
    write_file(input.path(), "x.ppd", ppd("Model X", "Acme").as_bytes());
    let packager = Packager::new(ResourceLocator::new(vec![
        ppdpack::common::fs::resources::bundled_resource_dir(),
    ]));
    let options = BuildOptions::default();
    let artifact = pack::create_archive(input.path(), &options, &PpdParser, &packager).unwrap();
    assert!(artifact.text().starts_with("#!/usr/bin/env python3"));
    assert!(artifact.text().contains("def load_index(payload):"));
    assert!(artifact.text().contains(artifact.payload()));
}

#[cfg(unix)]
#[test]
fn test_symlinked_document_is_archived_with_target_bytes() {
    use std::os::unix::fs::symlink;

    let input = tempdir().unwrap();
    let target = write_file(input.path(), "real/hp.doc", b"HP|HP driver");
    symlink(&target, input.path().join("alias.doc")).unwrap();
    write_file(input.path(), "acme.doc", b"Acme|Acme driver");

    let index = pack::build_index_from_dir(input.path(), &doc_options(), &pipe_parser).unwrap();
    let entries = index.bundle_entries().unwrap();
    assert_eq!(
        entries.keys().collect::<Vec<_>>(),
        vec!["acme.doc", "alias.doc", "real/hp.doc"]
    );
    assert_eq!(entries["alias.doc"], b"HP|HP driver");
    // Both paths carry key "HP"; the later one in traversal order wins.
    assert_eq!(index.lookup("HP").unwrap().relative_path, "real/hp.doc");

    let dangling = input.path().join("dangling.doc");
    symlink(input.path().join("gone.doc"), &dangling).unwrap();
    let err = pack::build_index_from_dir(input.path(), &doc_options(), &pipe_parser).unwrap_err();
    match err {
        PackError::DocumentRead { path, .. } => assert_eq!(path, dangling),
        other => panic!("expected DocumentRead, got {:?}", other),
    }
}
