//! End of central directory record.

use std::io::{self, Write};

use super::reader::{read_u16_le, read_u32_le, u32_at, write_u16_le, write_u32_le};
use super::{
    END_OF_CENTRAL_DIRECTORY_SIGNATURE, END_OF_CENTRAL_DIRECTORY_SIZE, MAX_COMMENT_SIZE,
    ZIP64_LOCATOR_SIGNATURE, ZIP64_LOCATOR_SIZE,
};
use crate::{Error, Result};

/// The trailing record that locates the central directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndOfCentralDirectory {
    /// Byte offset of the record within the archive.
    pub offset: usize,
    /// Number of this disk.
    pub disk_number: u16,
    /// Disk where the central directory starts.
    pub directory_disk: u16,
    /// Central directory records on this disk.
    pub entries_on_disk: u16,
    /// Central directory records in total.
    pub total_entries: u16,
    /// Size of the central directory in bytes.
    pub directory_size: u32,
    /// Offset of the central directory, relative to the start of the ZIP data.
    pub directory_offset: u32,
    /// Archive comment.
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    /// Scans backwards from the end of `data` for the EOCD record.
    ///
    /// The record sits in the last 22 bytes plus up to 64 KiB of comment, so
    /// the scan is bounded. A candidate is accepted only if its comment
    /// length fits inside the remaining input.
    pub fn locate(data: &[u8]) -> Result<Self> {
        if data.len() < END_OF_CENTRAL_DIRECTORY_SIZE {
            return Err(Error::InvalidFormat(format!(
                "input is {} bytes, smaller than an end of central directory record",
                data.len()
            )));
        }

        let last = data.len() - END_OF_CENTRAL_DIRECTORY_SIZE;
        let first = last.saturating_sub(MAX_COMMENT_SIZE);
        for offset in (first..=last).rev() {
            if u32_at(data, offset) != Some(END_OF_CENTRAL_DIRECTORY_SIGNATURE) {
                continue;
            }
            if let Some(record) = Self::parse_at(data, offset)? {
                return Ok(record);
            }
        }

        Err(Error::InvalidFormat(
            "end of central directory record not found".into(),
        ))
    }

    fn parse_at(data: &[u8], offset: usize) -> Result<Option<Self>> {
        let mut r = &data[offset + 4..];
        let map = |e: io::Error| Error::corrupt_header(offset as u64, e.to_string());
        let disk_number = read_u16_le(&mut r).map_err(map)?;
        let directory_disk = read_u16_le(&mut r).map_err(map)?;
        let entries_on_disk = read_u16_le(&mut r).map_err(map)?;
        let total_entries = read_u16_le(&mut r).map_err(map)?;
        let directory_size = read_u32_le(&mut r).map_err(map)?;
        let directory_offset = read_u32_le(&mut r).map_err(map)?;
        let comment_len = read_u16_le(&mut r).map_err(map)? as usize;
        if comment_len > r.len() {
            return Ok(None);
        }

        Ok(Some(Self {
            offset,
            disk_number,
            directory_disk,
            entries_on_disk,
            total_entries,
            directory_size,
            directory_offset,
            comment: r[..comment_len].to_vec(),
        }))
    }

    /// Returns `true` if a ZIP64 locator immediately precedes this record.
    pub fn has_zip64_locator(&self, data: &[u8]) -> bool {
        self.offset
            .checked_sub(ZIP64_LOCATOR_SIZE)
            .and_then(|at| u32_at(data, at))
            == Some(ZIP64_LOCATOR_SIGNATURE)
    }

    /// Returns `true` if the archive spans more than one disk.
    pub fn is_multi_disk(&self) -> bool {
        self.disk_number != 0
            || self.directory_disk != 0
            || self.entries_on_disk != self.total_entries
    }

    /// Writes the record, including the archive comment.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let comment_len = u16::try_from(self.comment.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "archive comment too long")
        })?;
        write_u32_le(w, END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
        write_u16_le(w, self.disk_number)?;
        write_u16_le(w, self.directory_disk)?;
        write_u16_le(w, self.entries_on_disk)?;
        write_u16_le(w, self.total_entries)?;
        write_u32_le(w, self.directory_size)?;
        write_u32_le(w, self.directory_offset)?;
        write_u16_le(w, comment_len)?;
        w.write_all(&self.comment)
    }
}
