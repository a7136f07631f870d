//! Property-based tests using proptest.
//!
//! These tests verify invariants of the manifest codec and the stabilization
//! pipeline using randomly generated inputs.

mod common;

use std::collections::BTreeMap;

use canonzip::stabilize::builtin::{self, sort_list};
use canonzip::{Manifest, MutableArchive, Pipeline, Section};
use common::{RawEntry, ZipBuilder};
use proptest::prelude::*;

/// Attribute names as the JAR specification allows them.
fn attribute_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_-]{0,24}"
}

/// Values of any length, including multi-byte characters, without line breaks.
fn attribute_value() -> impl Strategy<Value = String> {
    "[ -~\u{e9}\u{4e2d}\u{1F600}]{0,160}"
}

fn section() -> impl Strategy<Value = Section> {
    proptest::collection::vec((attribute_name(), attribute_value()), 1..6)
        .prop_map(|attributes| attributes.into_iter().collect())
}

fn manifest() -> impl Strategy<Value = Manifest> {
    (
        proptest::collection::vec((attribute_name(), attribute_value()), 0..8),
        proptest::collection::vec(section(), 0..3),
    )
        .prop_map(|(main, sections)| {
            let mut manifest = Manifest::new();
            *manifest.main_section_mut() = main.into_iter().collect();
            for section in sections {
                manifest.push_section(section);
            }
            manifest
        })
}

/// Entry paths keyed by name so every name is unique.
fn entries() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    proptest::collection::btree_map(
        "[a-z]{1,6}(/[a-z]{1,6}){0,2}(\\.txt|\\.json|\\.properties)?",
        proptest::collection::vec(any::<u8>(), 0..200),
        0..8,
    )
}

proptest! {
    /// Writing then parsing a manifest returns the same manifest.
    #[test]
    fn manifest_write_parse_roundtrip(manifest in manifest()) {
        let bytes = manifest.to_bytes();
        let parsed = Manifest::parse(&bytes).unwrap();
        prop_assert_eq!(&parsed, &manifest);
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }

    /// No encoded line exceeds the fold width.
    #[test]
    fn manifest_lines_fit_fold_width(manifest in manifest()) {
        let bytes = manifest.to_bytes();
        for line in bytes.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            prop_assert!(line.len() <= canonzip::manifest::MAX_LINE_LENGTH);
        }
    }

    /// Sorting yields sorted tokens, is idempotent, and keeps every token.
    #[test]
    fn sort_list_is_sorted_permutation(tokens in proptest::collection::vec("[a-z.]{0,8}", 1..10)) {
        let sorted = sort_list(&tokens.join(","));
        let out: Vec<&str> = sorted.split(',').collect();
        prop_assert!(out.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(sort_list(&sorted), sorted.clone());

        let mut expected = tokens.clone();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    /// Sorting does not depend on the input order.
    #[test]
    fn sort_list_ignores_input_order(tokens in proptest::collection::vec("[a-z]{1,4}", 1..8)) {
        let mut reversed = tokens.clone();
        reversed.reverse();
        prop_assert_eq!(sort_list(&tokens.join(",")), sort_list(&reversed.join(",")));
    }

    /// Stabilizing canonical output again changes nothing.
    #[test]
    fn pipeline_is_idempotent(
        files in entries(),
        main in proptest::collection::vec((attribute_name(), attribute_value()), 0..6),
        level in 0u32..10,
    ) {
        let mut builder = ZipBuilder::new();
        for (name, content) in &files {
            builder = builder.entry(RawEntry::file(name, content).level(level));
        }
        let mut manifest = Manifest::new();
        *manifest.main_section_mut() = main.into_iter().collect();
        manifest.main_section_mut().set("Built-By", "someone");
        manifest.main_section_mut().set("Export-Package", "c,b,a");
        builder = builder.file("META-INF/MANIFEST.MF", &manifest.to_bytes());

        let pipeline = Pipeline::builtin();
        let once = pipeline.stabilize(&builder.build()).unwrap();
        let twice = pipeline.stabilize(&once.bytes).unwrap();
        prop_assert_eq!(&once.bytes, &twice.bytes);
        prop_assert_eq!(twice.report.change_count(), 0);
    }

    /// Every surviving entry keeps its content, and no VCS file survives.
    #[test]
    fn pipeline_preserves_content(files in entries()) {
        let mut builder = ZipBuilder::new();
        for (name, content) in &files {
            builder = builder.file(name, content);
        }
        let stabilized = Pipeline::builtin().stabilize(&builder.build()).unwrap();
        let archive = MutableArchive::open(&stabilized.bytes).unwrap();

        for (name, content) in &files {
            let deleted = stabilized
                .report
                .pass(builtin::VCS_METADATA_FILES_NAME)
                .is_some_and(|pass| pass.changed().any(|n| n == name.as_str()));
            if deleted {
                prop_assert!(!archive.contains(name));
            } else {
                prop_assert_eq!(&archive.read(name).unwrap(), content);
            }
        }
    }

    /// Arbitrary bytes never panic the reader.
    #[test]
    fn open_arbitrary_bytes_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = MutableArchive::open(&data);
    }

    /// Arbitrary bytes never panic the manifest parser.
    #[test]
    fn parse_arbitrary_bytes_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = Manifest::parse(&data);
    }
}
