//! Stabilizer definitions.

use std::borrow::Cow;
use std::fmt;

use crate::archive::MutableArchive;
use crate::manifest::Manifest;
use crate::{Error, Result};

/// Selects archive entries by name.
#[derive(Debug, Clone)]
pub enum EntryMatcher {
    /// Names ending with the given suffix, at any path depth.
    Suffix(Cow<'static, str>),
    /// The name equals the given string.
    Exact(String),
    /// The compiled pattern matches somewhere in the name.
    Pattern(regex::Regex),
}

impl EntryMatcher {
    /// Matches names ending with `suffix`.
    pub fn suffix(suffix: impl Into<Cow<'static, str>>) -> Self {
        Self::Suffix(suffix.into())
    }

    /// Matches exactly one name.
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Compiles `pattern` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = regex::Regex::new(pattern).map_err(|e| Error::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::Pattern(regex))
    }

    /// Returns `true` if `name` is selected.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Suffix(suffix) => name.ends_with(suffix.as_ref()),
            Self::Exact(exact) => name == exact.as_str(),
            Self::Pattern(regex) => regex.is_match(name),
        }
    }
}

impl fmt::Display for EntryMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix(suffix) => write!(f, "*{suffix}"),
            Self::Exact(name) => write!(f, "{name}"),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Rewrites the content of a single entry.
#[derive(Debug, Clone, Copy)]
pub enum EntryTransform {
    /// Parses the entry as a manifest, edits it and writes it back.
    Manifest(fn(&mut Manifest) -> Result<()>),
    /// Maps raw content to new content. Receives the entry name.
    Content(fn(&str, &[u8]) -> Result<Vec<u8>>),
}

impl EntryTransform {
    /// Applies the transform and returns the new content.
    pub fn apply(&self, name: &str, content: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Manifest(edit) => {
                let mut manifest = Manifest::parse(content)?;
                edit(&mut manifest)?;
                Ok(manifest.to_bytes())
            }
            Self::Content(map) => map(name, content),
        }
    }
}

/// A whole-archive mutation.
#[derive(Debug, Clone)]
pub enum ArchiveAction {
    /// Deletes every entry the matcher selects.
    DeleteMatching(EntryMatcher),
    /// Arbitrary mutation. On error, the archive is restored to its state
    /// before the call.
    Custom(fn(&mut MutableArchive) -> Result<()>),
}

/// A stabilizer that acts on one matching entry at a time.
#[derive(Debug, Clone)]
pub struct EntryStabilizer {
    /// Stable identifier used in logs and reports.
    pub name: Cow<'static, str>,
    /// Entries the transform applies to. Others are left untouched.
    pub matcher: EntryMatcher,
    /// Content rewrite.
    pub transform: EntryTransform,
}

/// A stabilizer that acts on the whole entry set.
#[derive(Debug, Clone)]
pub struct ArchiveStabilizer {
    /// Stable identifier used in logs and reports.
    pub name: Cow<'static, str>,
    /// Mutation applied once per run.
    pub action: ArchiveAction,
}

/// Whether a stabilizer acts per entry or on the whole archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Invoked once per matching entry.
    Entry,
    /// Invoked once per run.
    Archive,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Archive => write!(f, "archive"),
        }
    }
}

/// A named normalization pass.
///
/// Stabilizers hold no state between runs and can be shared freely across
/// threads and pipelines.
#[derive(Debug, Clone)]
pub enum Stabilizer {
    /// Entry-scoped pass.
    Entry(EntryStabilizer),
    /// Archive-scoped pass.
    Archive(ArchiveStabilizer),
}

impl Stabilizer {
    /// Creates an entry-scoped stabilizer.
    pub fn entry(
        name: impl Into<Cow<'static, str>>,
        matcher: EntryMatcher,
        transform: EntryTransform,
    ) -> Self {
        Self::Entry(EntryStabilizer {
            name: name.into(),
            matcher,
            transform,
        })
    }

    /// Creates an archive-scoped stabilizer.
    pub fn archive(name: impl Into<Cow<'static, str>>, action: ArchiveAction) -> Self {
        Self::Archive(ArchiveStabilizer {
            name: name.into(),
            action,
        })
    }

    /// Returns the stabilizer's identifier.
    pub fn name(&self) -> &str {
        match self {
            Self::Entry(s) => &s.name,
            Self::Archive(s) => &s.name,
        }
    }

    /// Returns the stabilizer's scope.
    pub fn scope(&self) -> Scope {
        match self {
            Self::Entry(_) => Scope::Entry,
            Self::Archive(_) => Scope::Archive,
        }
    }

    /// Returns a one-line description of what the stabilizer targets.
    pub fn target(&self) -> String {
        match self {
            Self::Entry(s) => match s.transform {
                EntryTransform::Manifest(_) => format!("manifest {}", s.matcher),
                EntryTransform::Content(_) => format!("content {}", s.matcher),
            },
            Self::Archive(s) => match &s.action {
                ArchiveAction::DeleteMatching(matcher) => format!("delete {matcher}"),
                ArchiveAction::Custom(_) => "custom".to_string(),
            },
        }
    }
}
