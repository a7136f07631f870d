//! Manifest parser.

use super::{LineEnding, Manifest, Section};
use crate::{Error, Result};

/// Splits input into physical lines, reporting each line's terminator.
struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Lines<'a> {
    type Item = (&'a [u8], Option<LineEnding>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = self.rest.iter().position(|&b| b == b'\n' || b == b'\r') else {
            let line = self.rest;
            self.rest = &[];
            return Some((line, None));
        };
        let line = &self.rest[..end];
        let (ending, len) = match &self.rest[end..] {
            [b'\r', b'\n', ..] => (LineEnding::CrLf, 2),
            [b'\r', ..] => (LineEnding::Cr, 1),
            _ => (LineEnding::Lf, 1),
        };
        self.rest = &self.rest[end + len..];
        Some((line, Some(ending)))
    }
}

/// An attribute whose value may still grow through continuation lines.
struct Pending {
    line: usize,
    name: String,
    value: Vec<u8>,
}

impl Pending {
    fn finish(self, section: &mut Section) -> Result<()> {
        let value = String::from_utf8(self.value)
            .map_err(|_| Error::manifest_parse(self.line, "attribute value is not valid UTF-8"))?;
        section.set(self.name, value);
        Ok(())
    }
}

/// Parses manifest bytes into a [`Manifest`].
///
/// Records before the first blank line populate the main section; each
/// later blank-line-separated block becomes a per-entry section. A line
/// starting with one space continues the previous value. A repeated
/// attribute name keeps its first position and its last value.
///
/// The first line terminator seen (`\r\n`, `\n` or `\r`) is recorded and
/// reused by [`write`](super::write).
///
/// # Errors
///
/// [`Error::ManifestParse`] when a line lacks the `": "` separator, when
/// the input starts with a continuation line, when a continuation line
/// follows a blank line, or when a name or value is not UTF-8.
pub fn parse(bytes: &[u8]) -> Result<Manifest> {
    let mut manifest = Manifest::new();
    let mut current = Section::new();
    let mut in_main = true;
    let mut pending: Option<Pending> = None;
    let mut ending_seen = false;
    // Only true before the first record and right after a blank line.
    let mut at_block_start = true;

    for (index, (line, ending)) in (Lines { rest: bytes }).enumerate() {
        let line_no = index + 1;
        if let (false, Some(ending)) = (ending_seen, ending) {
            manifest.line_ending = ending;
            ending_seen = true;
        }

        if line.is_empty() {
            if let Some(p) = pending.take() {
                p.finish(&mut current)?;
            }
            if !at_block_start || in_main {
                close_section(&mut manifest, &mut current, &mut in_main);
            }
            at_block_start = true;
            continue;
        }

        if let Some(rest) = line.strip_prefix(b" ") {
            match pending.as_mut() {
                Some(p) => p.value.extend_from_slice(rest),
                None if line_no == 1 => {
                    return Err(Error::manifest_parse(
                        line_no,
                        "first line is a continuation line",
                    ));
                }
                None => {
                    return Err(Error::manifest_parse(
                        line_no,
                        "continuation line does not follow an attribute",
                    ));
                }
            }
            continue;
        }

        if let Some(p) = pending.take() {
            p.finish(&mut current)?;
        }
        let split = line
            .windows(2)
            .position(|w| w == b": ")
            .ok_or_else(|| Error::manifest_parse(line_no, "missing ': ' separator"))?;
        let name = std::str::from_utf8(&line[..split])
            .map_err(|_| Error::manifest_parse(line_no, "attribute name is not valid UTF-8"))?;
        pending = Some(Pending {
            line: line_no,
            name: name.to_string(),
            value: line[split + 2..].to_vec(),
        });
        at_block_start = false;
    }

    if let Some(p) = pending.take() {
        p.finish(&mut current)?;
    }
    if !current.is_empty() || in_main {
        close_section(&mut manifest, &mut current, &mut in_main);
    }
    Ok(manifest)
}

fn close_section(manifest: &mut Manifest, current: &mut Section, in_main: &mut bool) {
    let section = std::mem::take(current);
    if *in_main {
        manifest.main = section;
        *in_main = false;
    } else {
        manifest.sections.push(section);
    }
}
