//! Central directory file headers.

use std::io::{self, Write};

use super::reader::{read_bytes, read_u16_le, read_u32_le, write_u16_le, write_u32_le};
use super::{CENTRAL_DIRECTORY_HEADER_SIZE, CENTRAL_DIRECTORY_SIGNATURE};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// One central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    /// Host system (high byte) and specification version (low byte).
    pub version_made_by: u16,
    /// Minimum specification version needed to extract.
    pub version_needed: u16,
    /// General purpose bit flags.
    pub flags: u16,
    /// Compression method number.
    pub method: u16,
    /// Last modification time.
    pub modified: DosDateTime,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Size of the entry data as stored.
    pub compressed_size: u32,
    /// Size of the entry data after decompression.
    pub uncompressed_size: u32,
    /// Disk on which the entry starts.
    pub disk_start: u16,
    /// Internal file attributes.
    pub internal_attributes: u16,
    /// Host-dependent external attributes (Unix mode in the high half).
    pub external_attributes: u32,
    /// Offset of the local header, relative to the start of the ZIP data.
    pub local_header_offset: u32,
    /// Raw entry name.
    pub name: Vec<u8>,
    /// Extra field blocks.
    pub extra: Vec<u8>,
    /// Entry comment.
    pub comment: Vec<u8>,
}

impl CentralDirectoryHeader {
    /// Parses the record starting at `offset` in `data`.
    ///
    /// Returns the header and the offset just past it.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let truncated = |e: io::Error| {
            Error::corrupt_header(offset as u64, format!("truncated central directory record: {e}"))
        };
        let mut r = data.get(offset..).unwrap_or_default();
        let signature = read_u32_le(&mut r).map_err(truncated)?;
        if signature != CENTRAL_DIRECTORY_SIGNATURE {
            return Err(Error::corrupt_header(
                offset as u64,
                format!("expected central directory signature, found {signature:#010x}"),
            ));
        }

        let version_made_by = read_u16_le(&mut r).map_err(truncated)?;
        let version_needed = read_u16_le(&mut r).map_err(truncated)?;
        let flags = read_u16_le(&mut r).map_err(truncated)?;
        let method = read_u16_le(&mut r).map_err(truncated)?;
        let time = read_u16_le(&mut r).map_err(truncated)?;
        let date = read_u16_le(&mut r).map_err(truncated)?;
        let crc32 = read_u32_le(&mut r).map_err(truncated)?;
        let compressed_size = read_u32_le(&mut r).map_err(truncated)?;
        let uncompressed_size = read_u32_le(&mut r).map_err(truncated)?;
        let name_len = read_u16_le(&mut r).map_err(truncated)? as usize;
        let extra_len = read_u16_le(&mut r).map_err(truncated)? as usize;
        let comment_len = read_u16_le(&mut r).map_err(truncated)? as usize;
        let disk_start = read_u16_le(&mut r).map_err(truncated)?;
        let internal_attributes = read_u16_le(&mut r).map_err(truncated)?;
        let external_attributes = read_u32_le(&mut r).map_err(truncated)?;
        let local_header_offset = read_u32_le(&mut r).map_err(truncated)?;
        let name = read_bytes(&mut r, name_len).map_err(truncated)?;
        let extra = read_bytes(&mut r, extra_len).map_err(truncated)?;
        let comment = read_bytes(&mut r, comment_len).map_err(truncated)?;

        let next = offset + CENTRAL_DIRECTORY_HEADER_SIZE + name_len + extra_len + comment_len;
        Ok((
            Self {
                version_made_by,
                version_needed,
                flags,
                method,
                modified: DosDateTime::from_raw(time, date),
                crc32,
                compressed_size,
                uncompressed_size,
                disk_start,
                internal_attributes,
                external_attributes,
                local_header_offset,
                name,
                extra,
                comment,
            },
            next,
        ))
    }

    /// Returns the encoded size of this record.
    pub fn encoded_len(&self) -> usize {
        CENTRAL_DIRECTORY_HEADER_SIZE + self.name.len() + self.extra.len() + self.comment.len()
    }

    /// Writes the record.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let (time, date) = self.modified.to_raw();
        write_u32_le(w, CENTRAL_DIRECTORY_SIGNATURE)?;
        write_u16_le(w, self.version_made_by)?;
        write_u16_le(w, self.version_needed)?;
        write_u16_le(w, self.flags)?;
        write_u16_le(w, self.method)?;
        write_u16_le(w, time)?;
        write_u16_le(w, date)?;
        write_u32_le(w, self.crc32)?;
        write_u32_le(w, self.compressed_size)?;
        write_u32_le(w, self.uncompressed_size)?;
        write_u16_le(w, field_len(&self.name, "entry name")?)?;
        write_u16_le(w, field_len(&self.extra, "extra field")?)?;
        write_u16_le(w, field_len(&self.comment, "entry comment")?)?;
        write_u16_le(w, self.disk_start)?;
        write_u16_le(w, self.internal_attributes)?;
        write_u32_le(w, self.external_attributes)?;
        write_u32_le(w, self.local_header_offset)?;
        w.write_all(&self.name)?;
        w.write_all(&self.extra)?;
        w.write_all(&self.comment)
    }
}

/// Checks that a variable-length field fits its 16-bit length prefix.
pub(crate) fn field_len(field: &[u8], what: &str) -> io::Result<u16> {
    u16::try_from(field.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("{what} too long")))
}
