//! Fuzz target for MutableArchive::open and the full pipeline.
//!
//! This target exercises directory parsing, entry decoding and canonical
//! serialization with malformed or adversarial input. The goal is to find
//! panics, hangs, or memory issues.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use canonzip::{MutableArchive, Pipeline};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result - we're looking for panics or hangs
    let Ok(archive) = MutableArchive::open(data) else {
        return;
    };
    for entry in archive.entries() {
        let _ = entry.read();
    }

    // Canonical output must be a fixed point of the pipeline
    let pipeline = Pipeline::builtin();
    if let Ok(once) = pipeline.stabilize(data) {
        if let Ok(twice) = pipeline.stabilize(&once.bytes) {
            assert_eq!(once.bytes, twice.bytes, "stabilization is not idempotent");
        }
    }
});
