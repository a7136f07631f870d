//! JAR manifest model and codec.
//!
//! A manifest is a line-oriented list of `Name: Value` records. Long values
//! are folded onto continuation lines that start with a single space. Records
//! up to the first blank line form the *main* section; every following
//! blank-line-separated block is a named per-entry section.
//!
//! ```rust
//! use canonzip::Manifest;
//!
//! # fn main() -> canonzip::Result<()> {
//! let mut manifest = Manifest::parse(b"Manifest-Version: 1.0\r\nBuilt-By: joe\r\n\r\n")?;
//! manifest.main_section_mut().delete("Built-By");
//! assert_eq!(manifest.to_bytes(), b"Manifest-Version: 1.0\r\n\r\n");
//! # Ok(())
//! # }
//! ```

mod parse;
mod write;

pub use parse::parse;
pub use write::{MAX_LINE_LENGTH, write};

/// An ordered block of manifest attributes.
///
/// Names are compared exactly, without case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    attributes: Vec<(String, String)>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.attributes[i].1.as_str())
    }

    /// Sets an attribute.
    ///
    /// An existing attribute keeps its position; a new one is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.attributes[i].1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes an attribute and returns its value, if it was present.
    pub fn delete(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.attributes.remove(i).1)
    }

    /// Returns `true` if the attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the section has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the attribute names in order.
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the `Name` attribute of a per-entry section.
    pub fn name(&self) -> Option<&str> {
        self.get("Name")
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|(n, _)| n == name)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Section {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut section = Section::new();
        for (name, value) in iter {
            section.set(name, value);
        }
        section
    }
}

/// Line terminator used by a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnding {
    /// `\r\n`, the JAR convention.
    #[default]
    CrLf,
    /// `\n`.
    Lf,
    /// A bare `\r`.
    Cr,
}

impl LineEnding {
    /// Returns the terminator bytes.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n",
            Self::Lf => b"\n",
            Self::Cr => b"\r",
        }
    }
}

/// A parsed manifest: one main section plus named per-entry sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Section,
    sections: Vec<Section>,
    line_ending: LineEnding,
}

impl Manifest {
    /// Creates an empty manifest that writes `\r\n` line endings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses manifest bytes. See [`parse`].
    pub fn parse(bytes: &[u8]) -> crate::Result<Self> {
        parse(bytes)
    }

    /// Serializes the manifest. See [`write`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = write(self, &mut out);
        out
    }

    /// Returns the main section.
    pub fn main_section(&self) -> &Section {
        &self.main
    }

    /// Returns the main section for modification.
    pub fn main_section_mut(&mut self) -> &mut Section {
        &mut self.main
    }

    /// Returns the named per-entry sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the per-entry section whose `Name` attribute equals `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == Some(name))
    }

    /// Appends a per-entry section.
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Returns the line terminator used when writing.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Sets the line terminator used when writing.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }
}
