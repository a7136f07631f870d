//! Manifest serializer.

use std::io::{self, Write};

use super::{Manifest, Section};

/// Maximum length in bytes of an encoded manifest line, terminator excluded.
pub const MAX_LINE_LENGTH: usize = 72;

/// Writes a manifest.
///
/// The main section is written first and always followed by a blank line.
/// Each per-entry section follows, also terminated by a blank line.
/// Attributes keep their section order. An encoded `Name: Value` line longer
/// than [`MAX_LINE_LENGTH`] bytes is folded onto continuation lines, each a
/// single space followed by up to 71 bytes. Folding splits at byte
/// boundaries, so a multi-byte character may straddle two lines.
pub fn write<W: Write>(manifest: &Manifest, w: &mut W) -> io::Result<()> {
    let eol = manifest.line_ending().as_bytes();
    write_section(manifest.main_section(), eol, w)?;
    w.write_all(eol)?;
    for section in manifest.sections() {
        write_section(section, eol, w)?;
        w.write_all(eol)?;
    }
    Ok(())
}

fn write_section<W: Write>(section: &Section, eol: &[u8], w: &mut W) -> io::Result<()> {
    let mut line = Vec::with_capacity(MAX_LINE_LENGTH);
    for (name, value) in section.iter() {
        line.clear();
        line.extend_from_slice(name.as_bytes());
        line.extend_from_slice(b": ");
        line.extend_from_slice(value.as_bytes());
        write_folded(&line, eol, w)?;
    }
    Ok(())
}

fn write_folded<W: Write>(line: &[u8], eol: &[u8], w: &mut W) -> io::Result<()> {
    let (first, mut rest) = line.split_at(line.len().min(MAX_LINE_LENGTH));
    w.write_all(first)?;
    w.write_all(eol)?;
    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(rest.len().min(MAX_LINE_LENGTH - 1));
        w.write_all(b" ")?;
        w.write_all(chunk)?;
        w.write_all(eol)?;
        rest = tail;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{LineEnding, parse};

    fn lines(bytes: &[u8]) -> Vec<&[u8]> {
        bytes.split(|&b| b == b'\n').collect()
    }

    #[test]
    fn test_write_short_lines() {
        let mut manifest = Manifest::new();
        manifest.main_section_mut().set("Manifest-Version", "1.0");
        manifest.main_section_mut().set("Implementation-Title", "x");
        assert_eq!(
            manifest.to_bytes(),
            b"Manifest-Version: 1.0\r\nImplementation-Title: x\r\n\r\n"
        );
    }

    #[test]
    fn test_write_folds_at_72_bytes() {
        let mut manifest = Manifest::new();
        manifest.set_line_ending(LineEnding::Lf);
        let value = "a".repeat(200);
        manifest.main_section_mut().set("Export-Package", value.as_str());
        let bytes = manifest.to_bytes();

        let physical = lines(&bytes);
        assert_eq!(physical[0].len(), 72);
        for continuation in &physical[1..physical.len() - 2] {
            assert_eq!(continuation[0], b' ');
            assert!(continuation.len() <= 72);
        }
        // 16 + 200 = 216 bytes: 72 on the first line, then 71 + 71 + 2.
        assert_eq!(physical.len(), 4 + 2);

        let reparsed = parse(&bytes).unwrap();
        assert_eq!(reparsed.main_section().get("Export-Package"), Some(value.as_str()));
    }

    #[test]
    fn test_write_exactly_72_bytes_is_not_folded() {
        let mut manifest = Manifest::new();
        manifest.set_line_ending(LineEnding::Lf);
        // "K: " + 69 bytes = 72
        manifest.main_section_mut().set("K", "v".repeat(69));
        let bytes = manifest.to_bytes();
        assert_eq!(lines(&bytes).len(), 3);
    }

    #[test]
    fn test_write_named_sections() {
        let mut manifest = Manifest::new();
        manifest.set_line_ending(LineEnding::Lf);
        manifest.main_section_mut().set("Manifest-Version", "1.0");
        manifest.push_section([("Name", "a/"), ("Sealed", "true")].into_iter().collect());
        assert_eq!(
            manifest.to_bytes(),
            b"Manifest-Version: 1.0\n\nName: a/\nSealed: true\n\n"
        );
    }

    #[test]
    fn test_roundtrip_preserves_folded_input() {
        let input = b"Manifest-Version: 1.0\r\nExport-Package: com.example.alpha,com.example.beta,com.example.gamma,com\r\n .example.delta\r\n\r\n";
        let manifest = parse(input).unwrap();
        assert_eq!(manifest.to_bytes(), input);
    }

    #[test]
    fn test_roundtrip_multibyte_fold() {
        let mut manifest = Manifest::new();
        manifest.main_section_mut().set("Bundle-Name", "é".repeat(60));
        let bytes = manifest.to_bytes();
        let reparsed = parse(&bytes).unwrap();
        assert_eq!(reparsed, manifest);
    }
}
