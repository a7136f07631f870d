//! Error types for archive stabilization.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when opening, rewriting, or serializing ZIP-family archives
//! and their manifests, along with a convenient [`Result<T>`] type alias.
//!
//! # Error Kinds
//!
//! Every variant belongs to one of three coarse kinds, exposed through
//! [`Error::kind`]:
//!
//! | Kind | Variants | Typical Cause |
//! |------|----------|---------------|
//! | [`ErrorKind::Parse`] | [`InvalidFormat`][Error::InvalidFormat], [`CorruptHeader`][Error::CorruptHeader], [`DuplicateEntry`][Error::DuplicateEntry], [`ManifestParse`][Error::ManifestParse], [`UnsupportedFeature`][Error::UnsupportedFeature] | Malformed container or manifest |
//! | [`ErrorKind::Io`] | [`Io`][Error::Io], [`UnsupportedMethod`][Error::UnsupportedMethod], [`CrcMismatch`][Error::CrcMismatch] | Entry data cannot be read or written |
//! | [`ErrorKind::Usage`] | [`EntryNotFound`][Error::EntryNotFound], [`EntryExists`][Error::EntryExists], [`InvalidRegex`][Error::InvalidRegex] | Caller mistakes |
//!
//! Inside a pipeline run, errors raised by a single stabilizer on a single
//! entry are caught and recorded in the audit trail. Only errors raised while
//! establishing the entry list are returned to the caller.
//!
//! ```rust
//! use canonzip::{Error, ErrorKind, MutableArchive};
//!
//! match MutableArchive::open(b"definitely not a zip") {
//!     Err(e) => assert_eq!(e.kind(), ErrorKind::Parse),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use std::io;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed container structure or manifest syntax.
    Parse,
    /// Entry content cannot be read, decompressed, written or compressed.
    Io,
    /// The caller asked for something that does not exist or already exists.
    Usage,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "parse error"),
            Self::Io => write!(f, "I/O error"),
            Self::Usage => write!(f, "usage error"),
        }
    }
}

/// The main error type for stabilization operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred, usually while inflating or deflating entry data.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a ZIP-family archive.
    ///
    /// Returned when no end-of-central-directory record can be located.
    #[error("Invalid ZIP format: {0}")]
    InvalidFormat(String),

    /// A directory or local header record is truncated or inconsistent.
    #[error("Corrupt header at offset {offset:#x}: {reason}")]
    CorruptHeader {
        /// The byte offset where corruption was detected.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// Two central-directory records carry the same entry name.
    #[error("Duplicate entry name in central directory: {name}")]
    DuplicateEntry {
        /// The repeated entry name.
        name: String,
    },

    /// The entry uses a compression method this crate cannot decode.
    #[error("Unsupported compression method {method} for entry '{entry_name}'")]
    UnsupportedMethod {
        /// The ZIP method number.
        method: u16,
        /// Name of the affected entry.
        entry_name: String,
    },

    /// The archive uses a container feature this crate does not handle.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// Decompressed entry data does not match the recorded CRC-32.
    #[error("CRC mismatch for entry '{entry_name}': expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        /// Name of the affected entry.
        entry_name: String,
        /// The CRC recorded in the central directory.
        expected: u32,
        /// The CRC of the decompressed data.
        actual: u32,
    },

    /// A manifest line could not be parsed.
    #[error("Manifest parse error at line {line}: {reason}")]
    ManifestParse {
        /// One-based physical line number.
        line: usize,
        /// A description of the problem.
        reason: String,
    },

    /// No live entry has the given name.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// The requested name.
        name: String,
    },

    /// A live entry already has the given name.
    #[error("Entry already exists: {name}")]
    EntryExists {
        /// The conflicting name.
        name: String,
    },

    /// An entry-name pattern failed to compile.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex {
        /// The invalid pattern.
        pattern: String,
        /// The compiler's explanation.
        reason: String,
    },
}

impl Error {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFormat(_)
            | Error::CorruptHeader { .. }
            | Error::DuplicateEntry { .. }
            | Error::UnsupportedFeature { .. }
            | Error::ManifestParse { .. } => ErrorKind::Parse,
            Error::Io(_) | Error::UnsupportedMethod { .. } | Error::CrcMismatch { .. } => {
                ErrorKind::Io
            }
            Error::EntryNotFound { .. } | Error::EntryExists { .. } | Error::InvalidRegex { .. } => {
                ErrorKind::Usage
            }
        }
    }

    /// Returns `true` if this is a data corruption error.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CrcMismatch { .. } | Error::CorruptHeader { .. }
        )
    }

    /// Returns `true` if this error is related to unsupported features or methods.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedMethod { .. } | Error::UnsupportedFeature { .. }
        )
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::DuplicateEntry { name }
            | Error::EntryNotFound { name }
            | Error::EntryExists { name } => Some(name.as_str()),
            Error::UnsupportedMethod { entry_name, .. } | Error::CrcMismatch { entry_name, .. } => {
                Some(entry_name.as_str())
            }
            _ => None,
        }
    }

    /// Creates a CorruptHeader error.
    pub fn corrupt_header(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptHeader {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a ManifestParse error.
    pub fn manifest_parse(line: usize, reason: impl Into<String>) -> Self {
        Error::ManifestParse {
            line,
            reason: reason.into(),
        }
    }

    /// Creates a CrcMismatch error.
    pub fn crc_mismatch(entry_name: impl Into<String>, expected: u32, actual: u32) -> Self {
        Error::CrcMismatch {
            entry_name: entry_name.into(),
            expected,
            actual,
        }
    }
}

/// A specialized Result type for stabilization operations.
pub type Result<T> = std::result::Result<T, Error>;
