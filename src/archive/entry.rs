//! Archive entries and their container metadata.

use crate::checksum::{Checksum, Crc32};
use crate::codec::{self, CompressionMethod};
use crate::format::{MSDOS_DIRECTORY_ATTRIBUTE, unix_mode};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// Container-level metadata of an entry as it was read.
///
/// The serializer ignores most of these fields and writes normalized values
/// instead; they are kept so callers can inspect what the input looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Compression method number.
    pub method: u16,
    /// Last modification time.
    pub modified: DosDateTime,
    /// Host-dependent external attributes.
    pub external_attributes: u32,
    /// "Version made by" field.
    pub version_made_by: u16,
    /// "Version needed to extract" field.
    pub version_needed: u16,
    /// General purpose bit flags.
    pub flags: u16,
    /// Entry comment, preserved on rewrite.
    pub comment: Vec<u8>,
    /// Original name bytes when they were not valid UTF-8.
    pub(crate) raw_name: Option<Vec<u8>>,
}

impl EntryMetadata {
    /// Metadata for an entry created in memory.
    pub(crate) fn for_new(method: CompressionMethod) -> Self {
        Self {
            method: method.id(),
            modified: DosDateTime::EPOCH,
            external_attributes: (unix_mode::S_IFREG | 0o644) << 16,
            version_made_by: crate::format::VERSION_MADE_BY_UNIX,
            version_needed: method.version_needed(),
            flags: 0,
            comment: Vec::new(),
            raw_name: None,
        }
    }

    /// Returns the Unix permission bits, if the entry was made on a Unix host.
    pub fn unix_mode(&self) -> Option<u32> {
        if self.version_made_by >> 8 == 3 {
            Some((self.external_attributes >> 16) & 0o7777)
        } else {
            None
        }
    }

    /// Returns `true` if the external attributes mark a directory.
    pub fn has_directory_attribute(&self) -> bool {
        self.external_attributes & MSDOS_DIRECTORY_ATTRIBUTE != 0
    }
}

/// Entry content in one of its two representations.
#[derive(Debug, Clone)]
pub(crate) enum EntryData {
    /// Bytes exactly as stored in the input archive.
    Packed {
        data: Vec<u8>,
        crc32: u32,
        uncompressed_size: u32,
    },
    /// Logical content supplied through [`MutableArchive::set_content`] or
    /// [`MutableArchive::add_entry`].
    ///
    /// [`MutableArchive::set_content`]: super::MutableArchive::set_content
    /// [`MutableArchive::add_entry`]: super::MutableArchive::add_entry
    Content(Vec<u8>),
}

/// A named entry of a [`MutableArchive`](super::MutableArchive).
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub(crate) name: String,
    pub(crate) metadata: EntryMetadata,
    pub(crate) data: EntryData,
    pub(crate) revision: u32,
}

impl ArchiveEntry {
    /// Returns the entry name (path within the archive).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the container metadata read from the input.
    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    /// Returns `true` for directory entries (names ending in `/`).
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Returns the compression method if it is one this crate can decode.
    pub fn method(&self) -> Option<CompressionMethod> {
        CompressionMethod::from_id(self.metadata.method)
    }

    /// Returns the uncompressed size of the entry.
    pub fn size(&self) -> u64 {
        match &self.data {
            EntryData::Packed {
                uncompressed_size, ..
            } => u64::from(*uncompressed_size),
            EntryData::Content(content) => content.len() as u64,
        }
    }

    /// Returns `true` once the content has been replaced in this session.
    pub fn is_modified(&self) -> bool {
        matches!(self.data, EntryData::Content(_))
    }

    /// Returns the number of content replacements applied to this entry.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Returns the decompressed content.
    ///
    /// Fails with an I/O-kind error when the method is unsupported, the data
    /// cannot be inflated, or the CRC-32 does not match.
    pub fn read(&self) -> Result<Vec<u8>> {
        match &self.data {
            EntryData::Content(content) => Ok(content.clone()),
            EntryData::Packed {
                data,
                crc32,
                uncompressed_size,
            } => {
                let method = self.method().ok_or_else(|| Error::UnsupportedMethod {
                    method: self.metadata.method,
                    entry_name: self.name.clone(),
                })?;
                let content = codec::decode(method, data, u64::from(*uncompressed_size))?;
                let actual = Crc32::compute(&content);
                if actual != *crc32 {
                    return Err(Error::crc_mismatch(&self.name, *crc32, actual));
                }
                Ok(content)
            }
        }
    }
}
