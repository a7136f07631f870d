//! Local file headers.

use std::io::{self, Write};

use super::central::field_len;
use super::reader::{read_u16_le, read_u32_le, write_u16_le, write_u32_le};
use super::{LOCAL_FILE_HEADER_SIGNATURE, LOCAL_FILE_HEADER_SIZE};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// The header that precedes each entry's data.
///
/// When the data-descriptor flag is set, the CRC and size fields here are
/// zero and the real values live in the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
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
    /// Raw entry name.
    pub name: Vec<u8>,
    /// Extra field blocks.
    pub extra: Vec<u8>,
}

impl LocalFileHeader {
    /// Reads the fixed part of the header at `offset` and returns the offset
    /// at which the entry data begins.
    ///
    /// Name and extra field are skipped rather than copied; the central
    /// directory already carries the authoritative name.
    pub fn data_offset(data: &[u8], offset: usize) -> Result<usize> {
        let truncated = |e: io::Error| {
            Error::corrupt_header(offset as u64, format!("truncated local file header: {e}"))
        };
        let mut r = data.get(offset..).unwrap_or_default();
        let signature = read_u32_le(&mut r).map_err(truncated)?;
        if signature != LOCAL_FILE_HEADER_SIGNATURE {
            return Err(Error::corrupt_header(
                offset as u64,
                format!("expected local file header signature, found {signature:#010x}"),
            ));
        }
        // version, flags, method, time, date, crc, sizes
        let fixed = &data[offset + 4..];
        let mut r = fixed.get(22..).unwrap_or_default();
        let name_len = read_u16_le(&mut r).map_err(truncated)? as usize;
        let extra_len = read_u16_le(&mut r).map_err(truncated)? as usize;

        let start = offset + LOCAL_FILE_HEADER_SIZE + name_len + extra_len;
        if start > data.len() {
            return Err(Error::corrupt_header(
                offset as u64,
                "local file header name or extra field runs past end of input",
            ));
        }
        Ok(start)
    }

    /// Returns the encoded size of this header.
    pub fn encoded_len(&self) -> usize {
        LOCAL_FILE_HEADER_SIZE + self.name.len() + self.extra.len()
    }

    /// Writes the header (not the data).
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let (time, date) = self.modified.to_raw();
        write_u32_le(w, LOCAL_FILE_HEADER_SIGNATURE)?;
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
        w.write_all(&self.name)?;
        w.write_all(&self.extra)
    }
}
