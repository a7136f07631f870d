//! In-memory, mutable model of a ZIP-family archive.
//!
//! [`MutableArchive`] is built once from the raw bytes of a container,
//! mutated by a pipeline run, and serialized back to canonical bytes:
//!
//! ```rust
//! use canonzip::{CompressionMethod, MutableArchive};
//!
//! # fn main() -> canonzip::Result<()> {
//! let mut archive = MutableArchive::new();
//! archive.add_entry("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n\r\n".to_vec(), CompressionMethod::Deflated)?;
//! archive.add_entry("META-INF/git.properties", b"git.commit.id=abc".to_vec(), CompressionMethod::Stored)?;
//! let bytes = archive.to_bytes()?;
//!
//! let mut reopened = MutableArchive::open(&bytes)?;
//! assert!(reopened.delete_entry("META-INF/git.properties"));
//! assert_eq!(reopened.names(), ["META-INF/MANIFEST.MF"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Slots
//!
//! Entries live in name-keyed slots. Deleting an entry empties its slot
//! instead of shifting the others, so a snapshot of names taken before a
//! pass stays valid while that pass deletes or replaces entries. The order
//! of surviving entries is always the central-directory order of the input,
//! followed by added entries in insertion order.

mod entry;
mod options;
mod serialize;

use std::collections::HashMap;

pub use entry::{ArchiveEntry, EntryMetadata};
pub use options::SerializeOptions;

use entry::EntryData;

use crate::codec::CompressionMethod;
use crate::format::central::CentralDirectoryHeader;
use crate::format::eocd::EndOfCentralDirectory;
use crate::format::local::LocalFileHeader;
use crate::format::flags;
use crate::{Error, Result};

/// A ZIP-family archive held in memory for rewriting.
#[derive(Debug, Clone, Default)]
pub struct MutableArchive {
    slots: Vec<Option<ArchiveEntry>>,
    index: HashMap<String, usize>,
    prefix: Vec<u8>,
    comment: Vec<u8>,
}

impl MutableArchive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the central directory of `data` and loads every entry.
    ///
    /// Entry data is copied as stored; it is decompressed only when read.
    /// Bytes in front of the first local header (a launcher script, for
    /// example) are kept and written back verbatim.
    ///
    /// # Errors
    ///
    /// Fails with a parse-kind error if the directory cannot be located,
    /// is truncated, names an entry twice, or uses ZIP64, multi-disk or
    /// encryption features.
    pub fn open(data: &[u8]) -> Result<Self> {
        let eocd = EndOfCentralDirectory::locate(data)?;
        if eocd.has_zip64_locator(data) {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }
        if eocd.is_multi_disk() {
            return Err(Error::UnsupportedFeature {
                feature: "multi-disk archives",
            });
        }

        let directory_start = eocd
            .offset
            .checked_sub(eocd.directory_size as usize)
            .ok_or_else(|| {
                Error::corrupt_header(
                    eocd.offset as u64,
                    "central directory size exceeds its position",
                )
            })?;
        // Non-zero when the ZIP data is preceded by a prefix its offsets ignore.
        let base = directory_start
            .checked_sub(eocd.directory_offset as usize)
            .ok_or_else(|| {
                Error::corrupt_header(
                    eocd.offset as u64,
                    "central directory offset points past its recorded position",
                )
            })?;

        let mut archive = Self {
            comment: eocd.comment.clone(),
            ..Self::default()
        };
        let mut first_local = directory_start;
        let mut offset = directory_start;

        for index in 0..eocd.total_entries {
            if offset >= eocd.offset {
                return Err(Error::corrupt_header(
                    offset as u64,
                    format!(
                        "central directory ends after {index} of {} records",
                        eocd.total_entries
                    ),
                ));
            }
            let (header, next) = CentralDirectoryHeader::parse(data, offset)?;
            if next > eocd.offset {
                return Err(Error::corrupt_header(
                    offset as u64,
                    "central directory record overruns the end of central directory",
                ));
            }

            let local = load_entry(data, base, offset, &header, &mut archive)?;
            first_local = first_local.min(local);
            offset = next;
        }

        archive.prefix = data[..first_local].to_vec();
        log::debug!(
            "opened archive with {} entries ({} prefix bytes)",
            archive.len(),
            archive.prefix.len()
        );
        Ok(archive)
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the archive has no live entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if a live entry has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over live entries in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.slots.iter().flatten()
    }

    /// Returns a snapshot of live entry names in archive order.
    pub fn names(&self) -> Vec<String> {
        self.entries().map(|e| e.name.clone()).collect()
    }

    /// Looks up an entry by name.
    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        let slot = *self.index.get(name)?;
        self.slots[slot].as_ref()
    }

    /// Returns the decompressed content of an entry.
    ///
    /// # Errors
    ///
    /// [`Error::EntryNotFound`] if no live entry has this name, otherwise the
    /// I/O-kind errors of [`ArchiveEntry::read`].
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.entry(name)
            .ok_or_else(|| Error::EntryNotFound {
                name: name.to_string(),
            })?
            .read()
    }

    /// Replaces the logical content of an entry.
    ///
    /// The compression method is retained. An entry stored with a method
    /// this crate cannot encode is switched to deflate. Sizes and CRC are
    /// recomputed when the archive is serialized.
    pub fn set_content(&mut self, name: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let entry = self.entry_mut(name).ok_or_else(|| Error::EntryNotFound {
            name: name.to_string(),
        })?;
        if entry.method().is_none() {
            let method = CompressionMethod::Deflated;
            log::debug!(
                "entry '{}' switches from method {} to {method}",
                entry.name,
                entry.metadata.method
            );
            entry.metadata.method = method.id();
            entry.metadata.version_needed = method.version_needed();
        }
        entry.data = EntryData::Content(content.into());
        entry.revision += 1;
        Ok(())
    }

    /// Appends a new entry.
    ///
    /// # Errors
    ///
    /// [`Error::EntryExists`] if a live entry already has this name.
    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        method: CompressionMethod,
    ) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::EntryExists { name });
        }
        self.push(ArchiveEntry {
            name,
            metadata: EntryMetadata::for_new(method),
            data: EntryData::Content(content.into()),
            revision: 0,
        });
        Ok(())
    }

    /// Removes an entry. Returns `false` if it was already absent.
    pub fn delete_entry(&mut self, name: &str) -> bool {
        match self.index.remove(name) {
            Some(slot) => {
                self.slots[slot] = None;
                true
            }
            None => false,
        }
    }

    /// Removes every entry whose name satisfies `predicate`.
    ///
    /// Returns the removed names in archive order.
    pub fn delete_matching(&mut self, mut predicate: impl FnMut(&str) -> bool) -> Vec<String> {
        let doomed: Vec<String> = self
            .entries()
            .filter(|e| predicate(&e.name))
            .map(|e| e.name.clone())
            .collect();
        for name in &doomed {
            self.delete_entry(name);
        }
        doomed
    }

    /// Returns the archive comment.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// Replaces the archive comment.
    pub fn set_comment(&mut self, comment: impl Into<Vec<u8>>) {
        self.comment = comment.into();
    }

    /// Returns the bytes that precede the ZIP data, if any.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut ArchiveEntry> {
        let slot = *self.index.get(name)?;
        self.slots[slot].as_mut()
    }

    fn push(&mut self, entry: ArchiveEntry) {
        self.index.insert(entry.name.clone(), self.slots.len());
        self.slots.push(Some(entry));
    }
}

/// Loads the entry described by `header` and returns its local header offset.
fn load_entry(
    data: &[u8],
    base: usize,
    record_offset: usize,
    header: &CentralDirectoryHeader,
    archive: &mut MutableArchive,
) -> Result<usize> {
    if header.flags & flags::ENCRYPTED != 0 {
        return Err(Error::UnsupportedFeature {
            feature: "encrypted entries",
        });
    }
    if header.compressed_size == u32::MAX
        || header.uncompressed_size == u32::MAX
        || header.local_header_offset == u32::MAX
    {
        return Err(Error::UnsupportedFeature { feature: "ZIP64" });
    }

    let local = base
        .checked_add(header.local_header_offset as usize)
        .filter(|&local| local < data.len())
        .ok_or_else(|| {
            Error::corrupt_header(
                record_offset as u64,
                "local header offset points past end of input",
            )
        })?;
    let start = LocalFileHeader::data_offset(data, local)?;
    let packed = start
        .checked_add(header.compressed_size as usize)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| {
            Error::corrupt_header(local as u64, "entry data runs past end of input")
        })?;

    let (name, raw_name) = match String::from_utf8(header.name.clone()) {
        Ok(name) => (name, None),
        Err(e) => (
            String::from_utf8_lossy(e.as_bytes()).into_owned(),
            Some(e.into_bytes()),
        ),
    };
    if archive.contains(&name) {
        return Err(Error::DuplicateEntry { name });
    }

    archive.push(ArchiveEntry {
        name,
        metadata: EntryMetadata {
            method: header.method,
            modified: header.modified,
            external_attributes: header.external_attributes,
            version_made_by: header.version_made_by,
            version_needed: header.version_needed,
            flags: header.flags,
            comment: header.comment.clone(),
            raw_name,
        },
        data: EntryData::Packed {
            data: packed.to_vec(),
            crc32: header.crc32,
            uncompressed_size: header.uncompressed_size,
        },
        revision: 0,
    });
    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MutableArchive {
        let mut archive = MutableArchive::new();
        archive
            .add_entry("a.txt", b"alpha".to_vec(), CompressionMethod::Deflated)
            .unwrap();
        archive
            .add_entry("b.txt", b"beta".to_vec(), CompressionMethod::Stored)
            .unwrap();
        archive
            .add_entry("c.txt", b"gamma".to_vec(), CompressionMethod::Deflated)
            .unwrap();
        archive
    }

    #[test]
    fn test_add_and_lookup() {
        let archive = sample();
        assert_eq!(archive.len(), 3);
        assert!(archive.contains("b.txt"));
        assert_eq!(archive.read("b.txt").unwrap(), b"beta");
        assert_eq!(archive.names(), ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut archive = sample();
        let err = archive
            .add_entry("a.txt", Vec::new(), CompressionMethod::Stored)
            .unwrap_err();
        assert!(matches!(err, Error::EntryExists { .. }));
    }

    #[test]
    fn test_delete_is_idempotent_and_preserves_order() {
        let mut archive = sample();
        assert!(archive.delete_entry("b.txt"));
        assert!(!archive.delete_entry("b.txt"));
        assert_eq!(archive.names(), ["a.txt", "c.txt"]);
        assert!(archive.entry("b.txt").is_none());
        assert!(matches!(
            archive.read("b.txt"),
            Err(Error::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_readd_after_delete_goes_last() {
        let mut archive = sample();
        archive.delete_entry("a.txt");
        archive
            .add_entry("a.txt", b"again".to_vec(), CompressionMethod::Stored)
            .unwrap();
        assert_eq!(archive.names(), ["b.txt", "c.txt", "a.txt"]);
        assert_eq!(archive.read("a.txt").unwrap(), b"again");
    }

    #[test]
    fn test_set_content_bumps_revision() {
        let mut archive = sample();
        archive.set_content("c.txt", b"delta".to_vec()).unwrap();
        let entry = archive.entry("c.txt").unwrap();
        assert_eq!(entry.revision(), 1);
        assert!(entry.is_modified());
        assert_eq!(entry.read().unwrap(), b"delta");

        let err = archive.set_content("missing", Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { .. }));
    }

    #[test]
    fn test_delete_matching() {
        let mut archive = sample();
        let removed = archive.delete_matching(|name| name != "b.txt");
        assert_eq!(removed, ["a.txt", "c.txt"]);
        assert_eq!(archive.names(), ["b.txt"]);
    }

    #[test]
    fn test_open_roundtrip() {
        let mut archive = sample();
        archive.set_comment(b"release".to_vec());
        let bytes = archive.to_bytes().unwrap();

        let reopened = MutableArchive::open(&bytes).unwrap();
        assert_eq!(reopened.names(), ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(reopened.read("a.txt").unwrap(), b"alpha");
        assert_eq!(reopened.read("b.txt").unwrap(), b"beta");
        assert_eq!(reopened.comment(), b"release");
        assert!(reopened.prefix().is_empty());
        assert_eq!(
            reopened.entry("b.txt").unwrap().method(),
            Some(CompressionMethod::Stored)
        );
    }

    #[test]
    fn test_open_garbage() {
        let err = MutableArchive::open(b"not a zip file at all, just some text").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }
}
