//! Shared test utilities for integration tests.
//!
//! The archives here are assembled byte by byte instead of with
//! [`canonzip::MutableArchive`], so the tests see the same kind of input a
//! third-party build tool would hand over: arbitrary timestamps and modes,
//! extra fields, data descriptors and prefixed launcher scripts.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;

/// Raw DOS time of 2024-03-15 13:37:42.
pub const SAMPLE_TIME: (u16, u16) = ((13 << 11) | (37 << 5) | 21, (44 << 9) | (3 << 5) | 15);

/// Raw DOS time of 2025-11-02 08:00:00.
pub const OTHER_TIME: (u16, u16) = (8 << 11, (45 << 9) | (11 << 5) | 2);

/// One entry as a build tool would write it.
#[derive(Debug, Clone)]
pub struct RawEntry {
    name: Vec<u8>,
    content: Vec<u8>,
    method: u16,
    level: u32,
    packed: Option<Vec<u8>>,
    time: (u16, u16),
    version_made_by: u16,
    external_attributes: u32,
    extra: Vec<u8>,
    data_descriptor: bool,
    utf8_flag: bool,
    comment: Vec<u8>,
}

impl RawEntry {
    /// A deflated regular file with Unix mode 0644.
    pub fn file(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            content: content.to_vec(),
            method: 8,
            level: 6,
            packed: None,
            time: SAMPLE_TIME,
            version_made_by: (3 << 8) | 20,
            external_attributes: (0o100_644) << 16,
            extra: Vec::new(),
            data_descriptor: false,
            utf8_flag: false,
            comment: Vec::new(),
        }
    }

    /// A stored directory entry.
    pub fn dir(name: &str) -> Self {
        Self {
            method: 0,
            external_attributes: ((0o040_755) << 16) | 0x10,
            ..Self::file(name, b"")
        }
    }

    /// Stores the content without compression.
    pub fn stored(mut self) -> Self {
        self.method = 0;
        self
    }

    /// Deflates the content with the given level.
    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Uses a method number and packed bytes verbatim.
    pub fn method(mut self, method: u16, packed: &[u8]) -> Self {
        self.method = method;
        self.packed = Some(packed.to_vec());
        self
    }

    /// Sets the raw `(time, date)` fields.
    pub fn time(mut self, time: (u16, u16)) -> Self {
        self.time = time;
        self
    }

    /// Sets Unix permission bits, keeping the file type.
    pub fn mode(mut self, mode: u32) -> Self {
        let file_type = (self.external_attributes >> 16) & 0o170_000;
        self.external_attributes = ((file_type | mode) << 16) | (self.external_attributes & 0x10);
        self
    }

    /// Marks the entry as written by an MS-DOS host.
    pub fn dos_host(mut self) -> Self {
        self.version_made_by = 20;
        self.external_attributes &= 0xFFFF;
        self
    }

    /// Appends an extra field block.
    pub fn extra(mut self, id: u16, data: &[u8]) -> Self {
        self.extra.extend_from_slice(&id.to_le_bytes());
        self.extra.extend_from_slice(&(data.len() as u16).to_le_bytes());
        self.extra.extend_from_slice(data);
        self
    }

    /// Writes sizes and CRC in a trailing data descriptor.
    pub fn data_descriptor(mut self) -> Self {
        self.data_descriptor = true;
        self
    }

    /// Uses raw name bytes, which need not be valid UTF-8.
    pub fn raw_name(mut self, name: &[u8]) -> Self {
        self.name = name.to_vec();
        self
    }

    /// Sets the UTF-8 name flag.
    pub fn utf8_flag(mut self) -> Self {
        self.utf8_flag = true;
        self
    }

    /// Sets the entry comment.
    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    fn packed(&self) -> Vec<u8> {
        if let Some(packed) = &self.packed {
            return packed.clone();
        }
        match self.method {
            8 => deflate(&self.content, self.level),
            _ => self.content.clone(),
        }
    }

    fn flags(&self) -> u16 {
        let mut flags = 0;
        if self.data_descriptor {
            flags |= 1 << 3;
        }
        if self.utf8_flag {
            flags |= 1 << 11;
        }
        flags
    }
}

/// Hand-rolled ZIP writer for test input.
#[derive(Debug, Clone, Default)]
pub struct ZipBuilder {
    entries: Vec<RawEntry>,
    prefix: Vec<u8>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deflated file with default metadata.
    pub fn file(self, name: &str, content: &[u8]) -> Self {
        self.entry(RawEntry::file(name, content))
    }

    pub fn entry(mut self, entry: RawEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Bytes placed before the ZIP data. Offsets are not adjusted for them,
    /// as with a launcher script concatenated onto a jar.
    pub fn prefix(mut self, prefix: &[u8]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = Vec::new();
        let mut directory = Vec::new();

        for entry in &self.entries {
            let packed = entry.packed();
            let crc = crc32fast::hash(&entry.content);
            let offset = zip.len() as u32;
            let (local_crc, local_csize, local_usize) = if entry.data_descriptor {
                (0, 0, 0)
            } else {
                (crc, packed.len() as u32, entry.content.len() as u32)
            };

            put_u32(&mut zip, 0x0403_4B50);
            put_u16(&mut zip, 20);
            put_u16(&mut zip, entry.flags());
            put_u16(&mut zip, entry.method);
            put_u16(&mut zip, entry.time.0);
            put_u16(&mut zip, entry.time.1);
            put_u32(&mut zip, local_crc);
            put_u32(&mut zip, local_csize);
            put_u32(&mut zip, local_usize);
            put_u16(&mut zip, entry.name.len() as u16);
            put_u16(&mut zip, entry.extra.len() as u16);
            zip.extend_from_slice(&entry.name);
            zip.extend_from_slice(&entry.extra);
            zip.extend_from_slice(&packed);
            if entry.data_descriptor {
                put_u32(&mut zip, 0x0807_4B50);
                put_u32(&mut zip, crc);
                put_u32(&mut zip, packed.len() as u32);
                put_u32(&mut zip, entry.content.len() as u32);
            }

            put_u32(&mut directory, 0x0201_4B50);
            put_u16(&mut directory, entry.version_made_by);
            put_u16(&mut directory, 20);
            put_u16(&mut directory, entry.flags());
            put_u16(&mut directory, entry.method);
            put_u16(&mut directory, entry.time.0);
            put_u16(&mut directory, entry.time.1);
            put_u32(&mut directory, crc);
            put_u32(&mut directory, packed.len() as u32);
            put_u32(&mut directory, entry.content.len() as u32);
            put_u16(&mut directory, entry.name.len() as u16);
            put_u16(&mut directory, entry.extra.len() as u16);
            put_u16(&mut directory, entry.comment.len() as u16);
            put_u16(&mut directory, 0);
            put_u16(&mut directory, 1);
            put_u32(&mut directory, entry.external_attributes);
            put_u32(&mut directory, offset);
            directory.extend_from_slice(&entry.name);
            directory.extend_from_slice(&entry.extra);
            directory.extend_from_slice(&entry.comment);
        }

        let directory_offset = zip.len() as u32;
        zip.extend_from_slice(&directory);
        put_u32(&mut zip, 0x0605_4B50);
        put_u16(&mut zip, 0);
        put_u16(&mut zip, 0);
        put_u16(&mut zip, self.entries.len() as u16);
        put_u16(&mut zip, self.entries.len() as u16);
        put_u32(&mut zip, directory.len() as u32);
        put_u32(&mut zip, directory_offset);
        put_u16(&mut zip, self.comment.len() as u16);
        zip.extend_from_slice(&self.comment);

        let mut out = self.prefix.clone();
        out.extend_from_slice(&zip);
        out
    }
}

/// Raw deflate of `data` at `level`.
pub fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("write to Vec cannot fail");
    encoder.finish().expect("write to Vec cannot fail")
}

/// Joins manifest lines with CRLF and terminates the main section.
pub fn manifest(lines: &[&str]) -> Vec<u8> {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out.into_bytes()
}

/// A manifest as a typical Maven build on a CI host would write it.
pub fn build_manifest(built_by: &str, build_time: &str, revision: &str) -> Vec<u8> {
    manifest(&[
        "Manifest-Version: 1.0",
        &format!("Built-By: {built_by}"),
        "Build-Jdk-Spec: 17",
        &format!("Build-Time: {build_time}"),
        &format!("SCM-Revision: {revision}"),
        "Implementation-Title: demo",
        "Implementation-Version: 1.0.0",
        "Created-By: Maven JAR Plugin 3.3.0",
    ])
}

/// Extracts a failed result's error, panicking on success.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}

/// Offset of the first central directory record in `zip`.
pub fn central_directory_offset(zip: &[u8]) -> usize {
    let eocd = zip.len() - 22 - comment_len(zip);
    u32::from_le_bytes(zip[eocd + 16..eocd + 20].try_into().unwrap()) as usize
}

fn comment_len(zip: &[u8]) -> usize {
    (0..=zip.len() - 22)
        .rev()
        .find(|&at| zip[at..at + 4] == [0x50, 0x4B, 0x05, 0x06])
        .map(|at| zip.len() - at - 22)
        .expect("end of central directory present")
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
