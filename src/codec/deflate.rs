//! Raw deflate streams (ZIP method 8).

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::bufread::DeflateDecoder;
use flate2::write::DeflateEncoder;

/// Settings for re-compressing entry content.
///
/// For a fixed flate2 backend, the same input and level always produce the
/// same stream. Canonical output relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateEncoderOptions {
    /// Compression level (0-9, default 6).
    pub level: u32,
}

impl Default for DeflateEncoderOptions {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl DeflateEncoderOptions {
    /// Creates options with the given compression level.
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    fn compression(&self) -> Compression {
        Compression::new(self.level)
    }
}

/// Inflates a raw deflate stream, producing at most `limit` bytes.
pub fn inflate(packed: &[u8], limit: u64) -> io::Result<Vec<u8>> {
    let capacity = usize::try_from(limit).unwrap_or(usize::MAX).min(1 << 26);
    let mut out = Vec::with_capacity(capacity);
    DeflateDecoder::new(packed).take(limit).read_to_end(&mut out)?;
    Ok(out)
}

/// Deflates `data` into a raw stream without zlib framing.
pub fn deflate(data: &[u8], options: &DeflateEncoderOptions) -> io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2), options.compression());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_roundtrip() {
        let data = b"Import-Package: org.osgi.framework;version=\"[1.8,2)\"".repeat(8);
        let packed = deflate(&data, &DeflateEncoderOptions::default()).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(inflate(&packed, data.len() as u64).unwrap(), data);
    }

    #[test]
    fn test_inflate_stops_at_limit() {
        let data = [b'x'; 1000];
        let packed = deflate(&data, &DeflateEncoderOptions::default()).unwrap();
        assert_eq!(inflate(&packed, 10).unwrap().len(), 10);
    }

    #[test]
    fn test_level_zero_stores_blocks() {
        let data = [b'x'; 1000];
        let packed = deflate(&data, &DeflateEncoderOptions::with_level(0)).unwrap();
        assert!(packed.len() > data.len());
        assert_eq!(inflate(&packed, 1000).unwrap(), data);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(DeflateEncoderOptions::default().level, 6);
        assert_eq!(DeflateEncoderOptions::with_level(100).level, 9);
    }

    #[test]
    fn test_inflate_rejects_reserved_block_type() {
        assert!(inflate(&[0xFF, 0xFF, 0xFF, 0xFF], 10).is_err());
    }
}
