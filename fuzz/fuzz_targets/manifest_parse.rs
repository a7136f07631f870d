//! Fuzz target for Manifest::parse with arbitrary byte input.
//!
//! Run with: cargo +nightly fuzz run manifest_parse
//!
//! Properties checked for every input that parses:
//! - Writing and parsing again yields the same manifest
//! - No written line exceeds the fold width

#![no_main]

use canonzip::Manifest;
use canonzip::manifest::MAX_LINE_LENGTH;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(manifest) = Manifest::parse(data) else {
        return;
    };
    let written = manifest.to_bytes();
    let reparsed = Manifest::parse(&written).expect("written manifest parses");
    assert_eq!(manifest, reparsed);

    for line in written.split(|&b| b == b'\n' || b == b'\r') {
        assert!(line.len() <= MAX_LINE_LENGTH, "overlong line: {:?}", line);
    }
});
