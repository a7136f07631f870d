//! Checksum computation utilities.
//!
//! This module provides the two checksums the crate needs:
//!
//! - **CRC-32** (IEEE 802.3 polynomial), recorded in every ZIP local header
//!   and central-directory record and verified when entry content is read.
//! - **SHA-256**, used to fingerprint canonical output so two stabilized
//!   candidates can be compared by digest instead of by full byte stream.
//!
//! # Example
//!
//! ```rust
//! use canonzip::checksum::{Checksum, Crc32, Sha256, to_hex};
//!
//! let mut crc = Crc32::new();
//! crc.update(b"Hello, ");
//! crc.update(b"World!");
//! assert_eq!(crc.finalize(), 0xEC4AC3D0);
//!
//! let digest = Sha256::compute(b"abc");
//! assert!(to_hex(&digest).starts_with("ba7816bf"));
//! ```

use sha2::Digest;

/// Common trait for checksum computation.
pub trait Checksum: Default + Clone {
    /// The output type of this checksum.
    type Output: Copy + Eq + std::fmt::Debug;

    /// Creates a new checksum calculator.
    fn new() -> Self;

    /// Updates the checksum with additional data.
    fn update(&mut self, data: &[u8]);

    /// Finishes the checksum computation and returns the value.
    fn finalize(&self) -> Self::Output;

    /// Computes the checksum of a single slice in one call.
    fn compute(data: &[u8]) -> Self::Output {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// CRC-32 checksum calculator.
///
/// Uses the IEEE 802.3 polynomial, which is the one ZIP records carry.
#[derive(Clone)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc32")
            .field("current", &self.hasher.clone().finalize())
            .finish()
    }
}

impl Checksum for Crc32 {
    type Output = u32;

    fn new() -> Self {
        Self {
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

/// SHA-256 digest calculator.
#[derive(Clone, Default)]
pub struct Sha256 {
    hasher: sha2::Sha256,
}

impl std::fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256").finish_non_exhaustive()
    }
}

impl Checksum for Sha256 {
    type Output = [u8; 32];

    fn new() -> Self {
        Self::default()
    }

    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(&self) -> [u8; 32] {
        let digest = self.hasher.clone().finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }
}

/// Formats bytes as lowercase hexadecimal.
pub fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
        assert_eq!(Crc32::compute(b""), 0);
    }

    #[test]
    fn test_crc32_incremental_matches_one_shot() {
        let mut crc = Crc32::new();
        crc.update(b"Manifest-Version: ");
        crc.update(b"1.0\r\n");
        assert_eq!(crc.finalize(), Crc32::compute(b"Manifest-Version: 1.0\r\n"));
    }

    #[test]
    fn test_sha256_known_value() {
        let digest = Sha256::compute(b"abc");
        assert_eq!(
            to_hex(&digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_incremental_matches_one_shot() {
        let mut sha = Sha256::new();
        sha.update(b"PK\x03\x04");
        sha.update(b"payload");
        assert_eq!(sha.finalize(), Sha256::compute(b"PK\x03\x04payload"));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab]), "000fab");
        assert_eq!(to_hex(&[]), "");
    }
}
