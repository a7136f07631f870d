//! Canonical serialization of a [`MutableArchive`].

use std::borrow::Cow;
use std::io::Write;

use super::entry::EntryData;
use super::{ArchiveEntry, MutableArchive, SerializeOptions};
use crate::checksum::{Checksum, Crc32};
use crate::codec::{self, CompressionMethod};
use crate::format::central::CentralDirectoryHeader;
use crate::format::eocd::EndOfCentralDirectory;
use crate::format::local::LocalFileHeader;
use crate::format::{MSDOS_DIRECTORY_ATTRIBUTE, VERSION_MADE_BY_UNIX, flags, unix_mode};
use crate::{Error, Result};

/// Entry data ready to be written.
struct Prepared<'a> {
    method: u16,
    version_needed: u16,
    crc32: u32,
    uncompressed_size: u32,
    data: Cow<'a, [u8]>,
}

impl MutableArchive {
    /// Serializes the archive with default [`SerializeOptions`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&SerializeOptions::default())
    }

    /// Serializes the archive with the given options.
    pub fn to_bytes_with(&self, options: &SerializeOptions) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out, options)?;
        Ok(out)
    }

    /// Writes the archive in canonical form and returns the bytes written.
    ///
    /// Every entry, touched or not, is written with the configured
    /// modification time and permission bits, re-encoded with the configured
    /// deflate level, without extra fields or data descriptors. Entries whose
    /// data cannot be decoded are carried over with their original packed
    /// bytes.
    pub fn write_to<W: Write>(&self, w: &mut W, options: &SerializeOptions) -> Result<u64> {
        let mut offset = self.prefix.len();
        w.write_all(&self.prefix)?;

        let mut directory = Vec::with_capacity(self.len());
        for entry in self.entries() {
            let prepared = prepare(entry, options)?;
            let name = entry
                .metadata
                .raw_name
                .clone()
                .unwrap_or_else(|| entry.name.as_bytes().to_vec());
            let flag_bits = if entry.metadata.raw_name.is_none() && !entry.name.is_ascii() {
                flags::UTF8
            } else {
                0
            };
            let compressed_size = u32::try_from(prepared.data.len())
                .map_err(|_| Error::UnsupportedFeature { feature: "ZIP64" })?;
            let local_header_offset =
                u32::try_from(offset).map_err(|_| Error::UnsupportedFeature { feature: "ZIP64" })?;

            let local = LocalFileHeader {
                version_needed: prepared.version_needed,
                flags: flag_bits,
                method: prepared.method,
                modified: options.modified_time(),
                crc32: prepared.crc32,
                compressed_size,
                uncompressed_size: prepared.uncompressed_size,
                name: name.clone(),
                extra: Vec::new(),
            };
            local.write(w)?;
            w.write_all(&prepared.data)?;
            offset += local.encoded_len() + prepared.data.len();

            directory.push(CentralDirectoryHeader {
                version_made_by: VERSION_MADE_BY_UNIX,
                version_needed: prepared.version_needed,
                flags: flag_bits,
                method: prepared.method,
                modified: options.modified_time(),
                crc32: prepared.crc32,
                compressed_size,
                uncompressed_size: prepared.uncompressed_size,
                disk_start: 0,
                internal_attributes: 0,
                external_attributes: external_attributes(entry, options),
                local_header_offset,
                name,
                extra: Vec::new(),
                comment: entry.metadata.comment.clone(),
            });
        }

        let directory_offset = offset;
        for header in &directory {
            header.write(w)?;
            offset += header.encoded_len();
        }

        let too_large = |_| Error::UnsupportedFeature { feature: "ZIP64" };
        let total_entries = u16::try_from(directory.len()).map_err(too_large)?;
        let eocd = EndOfCentralDirectory {
            offset,
            disk_number: 0,
            directory_disk: 0,
            entries_on_disk: total_entries,
            total_entries,
            directory_size: u32::try_from(offset - directory_offset).map_err(too_large)?,
            directory_offset: u32::try_from(directory_offset).map_err(too_large)?,
            comment: self.comment.clone(),
        };
        eocd.write(w)?;
        offset += crate::format::END_OF_CENTRAL_DIRECTORY_SIZE + self.comment.len();

        Ok(offset as u64)
    }
}

fn prepare<'a>(entry: &'a ArchiveEntry, options: &SerializeOptions) -> Result<Prepared<'a>> {
    match &entry.data {
        EntryData::Content(content) => encode(entry, content, options),
        EntryData::Packed {
            data,
            crc32,
            uncompressed_size,
        } => match entry.read() {
            Ok(content) => encode(entry, &content, options),
            Err(e) => {
                log::warn!(
                    "carrying entry '{}' over verbatim: {e}",
                    entry.name
                );
                Ok(Prepared {
                    method: entry.metadata.method,
                    version_needed: entry.metadata.version_needed,
                    crc32: *crc32,
                    uncompressed_size: *uncompressed_size,
                    data: Cow::Borrowed(data),
                })
            }
        },
    }
}

fn encode<'a>(
    entry: &ArchiveEntry,
    content: &[u8],
    options: &SerializeOptions,
) -> Result<Prepared<'a>> {
    let method = entry.method().unwrap_or(CompressionMethod::Deflated);
    let uncompressed_size =
        u32::try_from(content.len()).map_err(|_| Error::UnsupportedFeature { feature: "ZIP64" })?;
    let data = codec::encode(method, content, options.deflate())?;
    Ok(Prepared {
        method: method.id(),
        version_needed: method.version_needed(),
        crc32: Crc32::compute(content),
        uncompressed_size,
        data: Cow::Owned(data),
    })
}

fn external_attributes(entry: &ArchiveEntry, options: &SerializeOptions) -> u32 {
    if entry.is_directory() {
        ((unix_mode::S_IFDIR | options.dir_permissions()) << 16) | MSDOS_DIRECTORY_ATTRIBUTE
    } else {
        (unix_mode::S_IFREG | options.file_permissions()) << 16
    }
}
