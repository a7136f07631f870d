//! Built-in policy stabilizers for JAR-family artifacts.
//!
//! | Name | Scope | Effect |
//! |------|-------|--------|
//! | `build-metadata` | entry | Deletes [`BUILD_METADATA`] attributes from the main manifest section |
//! | `attribute-value-order` | entry | Sorts the comma-separated values of [`UNORDERED_LIST_ATTRIBUTES`] |
//! | `vcs-metadata-files` | archive | Deletes `git.json` and `git.properties` files at any depth |
//!
//! The attribute name lists are versioned so a change to either one is an
//! explicit, reviewable event.

use std::sync::LazyLock;

use regex::Regex;

use super::stabilizer::{ArchiveAction, EntryMatcher, EntryTransform, Stabilizer};
use crate::Result;
use crate::manifest::Manifest;

/// Name of the build-metadata stabilizer.
pub const BUILD_METADATA_NAME: &str = "build-metadata";
/// Name of the attribute-value-order stabilizer.
pub const ATTRIBUTE_VALUE_ORDER_NAME: &str = "attribute-value-order";
/// Name of the VCS-metadata-files stabilizer.
pub const VCS_METADATA_FILES_NAME: &str = "vcs-metadata-files";

/// Suffix identifying manifest entries, nested archives included.
pub const MANIFEST_SUFFIX: &str = "META-INF/MANIFEST.MF";

/// Pattern identifying files written by commit-metadata build plugins.
pub const VCS_METADATA_PATTERN: &str = r"\bgit\.(json|properties)$";

/// A named, versioned list of manifest attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSet {
    /// Bumped whenever `names` changes.
    pub version: u32,
    /// Attribute names, matched exactly.
    pub names: &'static [&'static str],
}

impl AttributeSet {
    /// Returns `true` if `name` is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name)
    }
}

/// Attributes that record facts about the build environment rather than
/// the artifact: timestamps, hosts, tool and JDK versions, build numbers and
/// commit identifiers.
pub const BUILD_METADATA: AttributeSet = AttributeSet {
    version: 1,
    names: &[
        "Archiver-Version",
        "Bnd-LastModified",
        "Build-Jdk",
        "Build-Jdk-Spec",
        "Build-Number",
        "Build-Time",
        "Built-By",
        "Built-Date",
        "Built-Host",
        "Built-OS",
        "Created-By",
        "Hudson-Build-Number",
        "Implementation-Build-Date",
        "Implementation-Build-Java-Vendor",
        "Implementation-Build-Java-Version",
        "Implementation-Build",
        "Jenkins-Build-Number",
        "Originally-Created-By",
        "Os-Version",
        "SCM-Git-Branch",
        "SCM-Revision",
        "SCM-Git-Commit-Dirty",
        "SCM-Git-Commit-ID",
        "SCM-Git-Commit-Abbrev",
        "SCM-Git-Commit-Description",
        "SCM-Git-Commit-Timestamp",
        "Source-Date-Epoch",
    ],
};

/// bnd headers whose value is a comma-joined list with no meaningful order.
///
/// Tokens are split on every comma. A quoted comma inside a single token
/// (as in a bnd directive value) is split as well.
pub const UNORDERED_LIST_ATTRIBUTES: AttributeSet = AttributeSet {
    version: 1,
    names: &[
        "Export-Package",
        "Include-Resource",
        "Provide-Capability",
        "Private-Package",
    ],
};

/// Returns every built-in stabilizer in its default order.
pub fn all() -> Vec<Stabilizer> {
    vec![
        build_metadata(),
        attribute_value_order(),
        vcs_metadata_files(),
    ]
}

/// Deletes [`BUILD_METADATA`] attributes from every manifest's main section.
pub fn build_metadata() -> Stabilizer {
    Stabilizer::entry(
        BUILD_METADATA_NAME,
        EntryMatcher::suffix(MANIFEST_SUFFIX),
        EntryTransform::Manifest(strip_build_metadata),
    )
}

/// Sorts the values of [`UNORDERED_LIST_ATTRIBUTES`] in every manifest's
/// main section.
pub fn attribute_value_order() -> Stabilizer {
    Stabilizer::entry(
        ATTRIBUTE_VALUE_ORDER_NAME,
        EntryMatcher::suffix(MANIFEST_SUFFIX),
        EntryTransform::Manifest(sort_unordered_lists),
    )
}

static VCS_METADATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VCS_METADATA_PATTERN).expect("built-in pattern compiles"));

/// Deletes commit-metadata files matching [`VCS_METADATA_PATTERN`].
pub fn vcs_metadata_files() -> Stabilizer {
    Stabilizer::archive(
        VCS_METADATA_FILES_NAME,
        ArchiveAction::DeleteMatching(EntryMatcher::Pattern(VCS_METADATA_REGEX.clone())),
    )
}

fn strip_build_metadata(manifest: &mut Manifest) -> Result<()> {
    let main = manifest.main_section_mut();
    for name in BUILD_METADATA.names {
        main.delete(name);
    }
    Ok(())
}

fn sort_unordered_lists(manifest: &mut Manifest) -> Result<()> {
    let main = manifest.main_section_mut();
    for name in UNORDERED_LIST_ATTRIBUTES.names {
        let Some(value) = main.get(name).filter(|v| !v.is_empty()) else {
            continue;
        };
        let sorted = sort_list(value);
        main.set(*name, sorted);
    }
    Ok(())
}

/// Splits on `,`, sorts the tokens byte-wise and joins them back.
pub fn sort_list(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split(',').collect();
    tokens.sort_unstable();
    tokens.join(",")
}
