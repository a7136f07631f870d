//! Serialization options for canonical archive output.

use crate::codec::DeflateEncoderOptions;
use crate::timestamp::DosDateTime;

/// Container metadata written uniformly for every entry on serialization.
///
/// Two builds of the same source routinely disagree on timestamps, permission
/// bits and compressor settings. Serialization overwrites all of them with
/// the values configured here, whether or not a stabilizer touched the entry.
///
/// # Example
///
/// ```rust
/// use canonzip::{DosDateTime, SerializeOptions};
///
/// let options = SerializeOptions::new()
///     .modified(DosDateTime::from_civil(2010, 1, 1, 0, 0, 0).unwrap())
///     .file_mode(0o600)
///     .deflate_level(9);
/// assert_eq!(options.deflate().level, 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    modified: DosDateTime,
    file_mode: u32,
    dir_mode: u32,
    deflate: DeflateEncoderOptions,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            modified: DosDateTime::EPOCH,
            file_mode: 0o644,
            dir_mode: 0o755,
            deflate: DeflateEncoderOptions::default(),
        }
    }
}

impl SerializeOptions {
    /// Creates options with the default canonical values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the modification time written for every entry.
    pub fn modified(mut self, modified: DosDateTime) -> Self {
        self.modified = modified;
        self
    }

    /// Sets the permission bits written for file entries.
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode & 0o7777;
        self
    }

    /// Sets the permission bits written for directory entries.
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode & 0o7777;
        self
    }

    /// Sets the deflate compression level (clamped to 0-9).
    pub fn deflate_level(mut self, level: u32) -> Self {
        self.deflate = DeflateEncoderOptions::with_level(level);
        self
    }

    /// Returns the configured modification time.
    pub fn modified_time(&self) -> DosDateTime {
        self.modified
    }

    /// Returns the configured file permission bits.
    pub fn file_permissions(&self) -> u32 {
        self.file_mode
    }

    /// Returns the configured directory permission bits.
    pub fn dir_permissions(&self) -> u32 {
        self.dir_mode
    }

    /// Returns the deflate encoder options.
    pub fn deflate(&self) -> &DeflateEncoderOptions {
        &self.deflate
    }
}
