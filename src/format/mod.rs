//! ZIP container constants, record definitions, and low-level parsing.
//!
//! A ZIP-family archive (JAR, WAR, AAR, wheel, plain ZIP) is a sequence of
//! local file headers each followed by entry data, then a central directory
//! with one record per entry, then an end-of-central-directory (EOCD) record.
//! The central directory is authoritative: entries are discovered from it and
//! local headers are only consulted to find where each entry's data begins.

pub mod central;
pub mod eocd;
pub mod local;
pub mod reader;

/// Local file header signature (`PK\x03\x04`).
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4B50;

/// Central directory file header signature (`PK\x01\x02`).
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4B50;

/// End of central directory signature (`PK\x05\x06`).
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4B50;

/// ZIP64 end of central directory locator signature (`PK\x06\x07`).
pub const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4B50;

/// Fixed size of a local file header, before name and extra field.
pub const LOCAL_FILE_HEADER_SIZE: usize = 30;

/// Fixed size of a central directory record, before name, extra and comment.
pub const CENTRAL_DIRECTORY_HEADER_SIZE: usize = 46;

/// Fixed size of the EOCD record, before the archive comment.
pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 22;

/// Size of the ZIP64 EOCD locator that precedes the EOCD in ZIP64 archives.
pub const ZIP64_LOCATOR_SIZE: usize = 20;

/// Largest archive comment the EOCD length field can describe.
pub const MAX_COMMENT_SIZE: usize = 0xFFFF;

/// General purpose bit flags.
pub mod flags {
    /// Entry data is encrypted.
    pub const ENCRYPTED: u16 = 1;
    /// Sizes and CRC follow the data in a data descriptor.
    pub const DATA_DESCRIPTOR: u16 = 1 << 3;
    /// Name and comment are UTF-8.
    pub const UTF8: u16 = 1 << 11;
}

/// "Version made by": host system Unix (3), specification 2.0.
pub const VERSION_MADE_BY_UNIX: u16 = (3 << 8) | 20;

/// Unix file type bits stored in the high half of the external attributes.
pub mod unix_mode {
    /// Regular file.
    pub const S_IFREG: u32 = 0o100_000;
    /// Directory.
    pub const S_IFDIR: u32 = 0o040_000;
}

/// MS-DOS directory attribute bit in the low half of the external attributes.
pub const MSDOS_DIRECTORY_ATTRIBUTE: u32 = 0x10;
