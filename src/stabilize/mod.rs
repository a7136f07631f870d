//! Stabilizers and the pipeline that applies them.
//!
//! A [`Stabilizer`] is one named normalization pass. It is either
//! entry-scoped, pairing an [`EntryMatcher`] with an [`EntryTransform`], or
//! archive-scoped, holding an [`ArchiveAction`] that sees the whole entry
//! set. Because both halves are plain values rather than opaque closures,
//! a [`Pipeline`] can list, log and selectively disable its passes.
//!
//! # Running a pipeline
//!
//! ```rust
//! use canonzip::{CompressionMethod, MutableArchive, Pipeline};
//!
//! # fn main() -> canonzip::Result<()> {
//! let mut archive = MutableArchive::new();
//! archive.add_entry(
//!     "META-INF/MANIFEST.MF",
//!     b"Manifest-Version: 1.0\r\nBuilt-By: joe\r\nExport-Package: b,a\r\n\r\n".to_vec(),
//!     CompressionMethod::Deflated,
//! )?;
//! archive.add_entry("git.properties", b"git.commit.id=abc".to_vec(), CompressionMethod::Deflated)?;
//!
//! let stabilized = Pipeline::builtin().stabilize(&archive.to_bytes()?)?;
//! let canonical = MutableArchive::open(&stabilized.bytes)?;
//! assert_eq!(canonical.names(), ["META-INF/MANIFEST.MF"]);
//! assert_eq!(
//!     canonical.read("META-INF/MANIFEST.MF")?,
//!     b"Manifest-Version: 1.0\r\nExport-Package: a,b\r\n\r\n"
//! );
//! assert!(!stabilized.report.has_failures());
//! # Ok(())
//! # }
//! ```
//!
//! # Execution model
//!
//! Passes run once each, in registration order. An entry-scoped pass
//! iterates over the entry names present when the pass starts, so it sees
//! deletions made by earlier passes but never its own. A pass that fails on
//! one entry records the failure and moves on; an archive-scoped custom
//! action that fails is rolled back.

pub mod builtin;

mod pipeline;
mod report;
mod stabilizer;

pub use pipeline::{Comparison, Pipeline, Stabilized, compare, stabilize_many};
pub use report::{EntryOutcome, EntryRecord, Failure, PassReport, StabilizeReport};
pub use stabilizer::{
    ArchiveAction, ArchiveStabilizer, EntryMatcher, EntryStabilizer, EntryTransform, Scope,
    Stabilizer,
};
