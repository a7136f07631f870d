//! # canonzip
//!
//! Canonicalization of ZIP-family build artifacts (JAR, WAR, AAR, plain ZIP)
//! for reproducible-build verification.
//!
//! Two builds of the same source routinely produce artifacts that differ
//! only in incidental ways: entry timestamps and permissions, manifest
//! attributes naming the build host or JDK, commit metadata files, and
//! lists whose order depends on hash iteration. This crate rewrites an
//! archive into a canonical form with that variation removed, so that two
//! semantically identical artifacts compare byte-for-byte equal.
//!
//! ## Quick Start
//!
//! ### Stabilizing an Artifact
//!
//! ```rust,no_run
//! use canonzip::{Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let input = std::fs::read("target/app-1.0.jar")?;
//!     let stabilized = Pipeline::builtin().stabilize(&input)?;
//!
//!     for (stabilizer, entry, failure) in stabilized.report.failures() {
//!         eprintln!("{stabilizer} could not process {entry:?}: {failure}");
//!     }
//!     std::fs::write("app-1.0.canonical.jar", &stabilized.bytes)?;
//!     println!("sha256 {}", stabilized.digest());
//!     Ok(())
//! }
//! ```
//!
//! ### Comparing Two Candidates
//!
//! ```rust,no_run
//! use canonzip::{Pipeline, Result, compare};
//!
//! fn main() -> Result<()> {
//!     let ours = std::fs::read("rebuild/app-1.0.jar")?;
//!     let theirs = std::fs::read("upstream/app-1.0.jar")?;
//!     let comparison = compare(&Pipeline::builtin(), &ours, &theirs)?;
//!     println!("reproducible: {}", comparison.reproducible);
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Pipelines
//!
//! ```rust
//! use canonzip::stabilize::builtin;
//! use canonzip::{ArchiveAction, EntryMatcher, Pipeline, SerializeOptions, Stabilizer};
//!
//! # fn main() -> canonzip::Result<()> {
//! let pipeline = Pipeline::new([builtin::build_metadata()])
//!     .with(Stabilizer::archive(
//!         "drop-sbom",
//!         ArchiveAction::DeleteMatching(EntryMatcher::pattern(r"\.cdx\.json$")?),
//!     ))
//!     .with_serialize_options(SerializeOptions::new().deflate_level(9));
//! assert_eq!(pipeline.names(), ["build-metadata", "drop-sbom"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic**: output depends only on the input bytes, the
//!   stabilizer list and its order, and the [`SerializeOptions`].
//! - **Idempotent**: stabilizing canonical output again yields the same bytes.
//! - **Fault tolerant**: a stabilizer that fails on one entry is recorded in
//!   the [`StabilizeReport`] and skipped. Only a container that cannot be
//!   opened at all fails the call.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. [`Error::kind`] classifies every error as
//! a parse, I/O or usage problem:
//!
//! ```rust
//! use canonzip::{ErrorKind, Pipeline};
//!
//! let err = Pipeline::builtin().stabilize(b"not an archive").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | yes | Stabilize independent archives on the rayon thread pool |
//! | `cli` | no | The `canonzip` command-line tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod format;
pub mod manifest;
pub mod stabilize;
pub mod timestamp;

pub use archive::{ArchiveEntry, EntryMetadata, MutableArchive, SerializeOptions};
pub use codec::CompressionMethod;
pub use error::{Error, ErrorKind, Result};
pub use manifest::{LineEnding, Manifest, Section};
pub use stabilize::{
    ArchiveAction, Comparison, EntryMatcher, EntryOutcome, EntryTransform, Pipeline,
    StabilizeReport, Stabilized, Stabilizer, compare, stabilize_many,
};
pub use timestamp::DosDateTime;
