//! Compression codecs for ZIP entries.
//!
//! Only the two methods that JARs and other build artifacts use in practice
//! are decoded: stored (method 0) and deflated (method 8). Entries compressed
//! with anything else can still be carried through a rewrite verbatim, but
//! their content cannot be opened.

pub mod deflate;

use std::io;

pub use deflate::DeflateEncoderOptions;

/// ZIP method numbers.
pub mod method {
    /// No compression.
    pub const STORED: u16 = 0;
    /// Raw deflate stream.
    pub const DEFLATED: u16 = 8;
}

/// A compression method this crate can both decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionMethod {
    /// Content is stored uncompressed.
    Stored,
    /// Content is a raw deflate stream.
    #[default]
    Deflated,
}

impl CompressionMethod {
    /// Maps a ZIP method number to a supported method.
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            method::STORED => Some(Self::Stored),
            method::DEFLATED => Some(Self::Deflated),
            _ => None,
        }
    }

    /// Returns the ZIP method number.
    pub fn id(self) -> u16 {
        match self {
            Self::Stored => method::STORED,
            Self::Deflated => method::DEFLATED,
        }
    }

    /// Returns the minimum ZIP specification version needed to extract.
    pub fn version_needed(self) -> u16 {
        match self {
            Self::Stored => 10,
            Self::Deflated => 20,
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::Deflated => write!(f, "deflated"),
        }
    }
}

/// Decompresses `packed` into a new buffer.
///
/// `expected_size` is the uncompressed size recorded in the directory. A
/// deflate stream is cut off one byte past it, so a corrupt stream cannot
/// expand past what the archive claims.
pub fn decode(method: CompressionMethod, packed: &[u8], expected_size: u64) -> io::Result<Vec<u8>> {
    let out = match method {
        CompressionMethod::Stored => packed.to_vec(),
        CompressionMethod::Deflated => deflate::inflate(packed, expected_size.saturating_add(1))?,
    };
    if out.len() as u64 != expected_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{method} data decoded to {} bytes, expected {expected_size}",
                out.len()
            ),
        ));
    }
    Ok(out)
}

/// Compresses `data` with the given method.
///
/// The output depends only on the input bytes and `options`, which is what
/// makes re-serialization of untouched entries deterministic.
pub fn encode(
    method: CompressionMethod,
    data: &[u8],
    options: &DeflateEncoderOptions,
) -> io::Result<Vec<u8>> {
    match method {
        CompressionMethod::Stored => Ok(data.to_vec()),
        CompressionMethod::Deflated => deflate::deflate(data, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_ids() {
        assert_eq!(CompressionMethod::from_id(0), Some(CompressionMethod::Stored));
        assert_eq!(CompressionMethod::from_id(8), Some(CompressionMethod::Deflated));
        assert_eq!(CompressionMethod::from_id(12), None);
        assert_eq!(CompressionMethod::Deflated.id(), 8);
        assert_eq!(CompressionMethod::Stored.version_needed(), 10);
        assert_eq!(CompressionMethod::Deflated.version_needed(), 20);
    }

    #[test]
    fn test_stored_roundtrip() {
        let data = b"Manifest-Version: 1.0\r\n\r\n";
        let packed = encode(
            CompressionMethod::Stored,
            data,
            &DeflateEncoderOptions::default(),
        )
        .unwrap();
        assert_eq!(packed, data);
        let unpacked = decode(CompressionMethod::Stored, &packed, data.len() as u64).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_deflate_roundtrip() {
        let data = b"Export-Package: org.a,org.b,org.c,org.a,org.b,org.c".repeat(20);
        let packed = encode(
            CompressionMethod::Deflated,
            &data,
            &DeflateEncoderOptions::default(),
        )
        .unwrap();
        assert!(packed.len() < data.len());
        let unpacked = decode(CompressionMethod::Deflated, &packed, data.len() as u64).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let data = b"the same bytes twice".repeat(100);
        let opts = DeflateEncoderOptions::with_level(9);
        let a = encode(CompressionMethod::Deflated, &data, &opts).unwrap();
        let b = encode(CompressionMethod::Deflated, &data, &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_size_mismatch() {
        let data = b"hello world";
        let packed = encode(
            CompressionMethod::Deflated,
            data,
            &DeflateEncoderOptions::default(),
        )
        .unwrap();
        let err = decode(CompressionMethod::Deflated, &packed, 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = decode(CompressionMethod::Stored, data, 20).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        let err = decode(CompressionMethod::Stored, data, 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_garbage_deflate() {
        let result = decode(CompressionMethod::Deflated, &[0xFF, 0xFF, 0xFF, 0xFF], 10);
        assert!(result.is_err());
    }
}
