//! The pipeline driver.

use std::collections::HashMap;

use super::builtin;
use super::report::{EntryOutcome, Failure, PassReport, StabilizeReport};
use super::stabilizer::{ArchiveAction, ArchiveStabilizer, EntryStabilizer, Stabilizer};
use crate::Result;
use crate::archive::{MutableArchive, SerializeOptions};
use crate::checksum::{Checksum, Sha256, to_hex};

/// An ordered list of stabilizers plus the serialization settings applied
/// after they run.
///
/// A pipeline owns no archive state and can be reused across any number of
/// archives, including concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stabilizers: Vec<Stabilizer>,
    options: SerializeOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Pipeline {
    /// Creates a pipeline running `stabilizers` in the given order.
    pub fn new(stabilizers: impl IntoIterator<Item = Stabilizer>) -> Self {
        Self {
            stabilizers: stabilizers.into_iter().collect(),
            options: SerializeOptions::default(),
        }
    }

    /// Creates a pipeline with every built-in stabilizer.
    pub fn builtin() -> Self {
        Self::new(builtin::all())
    }

    /// Appends a stabilizer.
    pub fn with(mut self, stabilizer: Stabilizer) -> Self {
        self.stabilizers.push(stabilizer);
        self
    }

    /// Removes every stabilizer with the given name.
    pub fn without(mut self, name: &str) -> Self {
        self.stabilizers.retain(|s| s.name() != name);
        self
    }

    /// Replaces the serialization settings.
    pub fn with_serialize_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the registered stabilizers in execution order.
    pub fn stabilizers(&self) -> &[Stabilizer] {
        &self.stabilizers
    }

    /// Returns the registered stabilizer names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.stabilizers.iter().map(Stabilizer::name).collect()
    }

    /// Returns the serialization settings.
    pub fn serialize_options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Applies every stabilizer once, in order, and returns the audit trail.
    ///
    /// Failures inside a pass are recorded and never abort the run.
    pub fn run(&self, archive: &mut MutableArchive) -> StabilizeReport {
        let mut report = StabilizeReport::default();
        for stabilizer in &self.stabilizers {
            log::debug!(
                "running {} stabilizer '{}'",
                stabilizer.scope(),
                stabilizer.name()
            );
            let pass = match stabilizer {
                Stabilizer::Entry(s) => run_entry_pass(s, archive),
                Stabilizer::Archive(s) => run_archive_pass(s, archive),
            };
            report.passes.push(pass);
        }
        log::debug!(
            "{} passes made {} changes, {} failures",
            report.passes.len(),
            report.change_count(),
            report.failures().count()
        );
        report
    }

    /// Opens `input`, runs the pipeline and serializes the result.
    ///
    /// # Errors
    ///
    /// Only failures to open the container or to serialize it are returned.
    /// Failures of individual passes are recorded in the report.
    pub fn stabilize(&self, input: &[u8]) -> Result<Stabilized> {
        let mut archive = MutableArchive::open(input)?;
        let report = self.run(&mut archive);
        let bytes = archive.to_bytes_with(&self.options)?;
        Ok(Stabilized { bytes, report })
    }
}

fn run_entry_pass(stabilizer: &EntryStabilizer, archive: &mut MutableArchive) -> PassReport {
    let mut pass = PassReport::new(&stabilizer.name, super::Scope::Entry);
    for name in archive.names() {
        if !stabilizer.matcher.matches(&name) {
            continue;
        }
        let outcome = match transform_entry(stabilizer, archive, &name) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("stabilizer '{}' skipped '{name}': {e}", stabilizer.name);
                EntryOutcome::Failed(Failure::from(&e))
            }
        };
        pass.record(name, outcome);
    }
    pass
}

fn transform_entry(
    stabilizer: &EntryStabilizer,
    archive: &mut MutableArchive,
    name: &str,
) -> Result<EntryOutcome> {
    let content = archive.read(name)?;
    let rewritten = stabilizer.transform.apply(name, &content)?;
    if rewritten == content {
        return Ok(EntryOutcome::Unchanged);
    }
    archive.set_content(name, rewritten)?;
    Ok(EntryOutcome::Modified)
}

fn run_archive_pass(stabilizer: &ArchiveStabilizer, archive: &mut MutableArchive) -> PassReport {
    let mut pass = PassReport::new(&stabilizer.name, super::Scope::Archive);
    match &stabilizer.action {
        ArchiveAction::DeleteMatching(matcher) => {
            for name in archive.delete_matching(|name| matcher.matches(name)) {
                pass.record(name, EntryOutcome::Deleted);
            }
        }
        ArchiveAction::Custom(action) => {
            let before = archive.clone();
            match action(archive) {
                Ok(()) => diff(&before, archive, &mut pass),
                Err(e) => {
                    log::warn!(
                        "stabilizer '{}' failed and was rolled back: {e}",
                        stabilizer.name
                    );
                    *archive = before;
                    pass.error = Some(Failure::from(&e));
                }
            }
        }
    }
    pass
}

/// Records what a custom action changed.
fn diff(before: &MutableArchive, after: &MutableArchive, pass: &mut PassReport) {
    let fingerprint = |archive: &MutableArchive| -> HashMap<String, (u32, bool)> {
        archive
            .entries()
            .map(|e| (e.name().to_string(), (e.revision(), e.is_modified())))
            .collect()
    };
    let old = fingerprint(before);
    let new = fingerprint(after);

    for name in before.names() {
        match new.get(&name) {
            None => pass.record(name, EntryOutcome::Deleted),
            Some(state) if Some(state) != old.get(&name) => {
                pass.record(name, EntryOutcome::Modified)
            }
            Some(_) => {}
        }
    }
    for name in after.names() {
        if !old.contains_key(&name) {
            pass.record(name, EntryOutcome::Added);
        }
    }
}

/// Canonical bytes produced by [`Pipeline::stabilize`], with the audit trail.
#[derive(Debug, Clone)]
pub struct Stabilized {
    /// Serialized archive.
    pub bytes: Vec<u8>,
    /// What each stabilizer did.
    pub report: StabilizeReport,
}

impl Stabilized {
    /// Returns the hex-encoded SHA-256 of the canonical bytes.
    pub fn digest(&self) -> String {
        to_hex(&Sha256::compute(&self.bytes))
    }
}

/// Stabilizes every input independently.
///
/// With the `parallel` feature, inputs are processed on the rayon thread
/// pool. A failure to open one input never affects the others.
#[cfg(feature = "parallel")]
pub fn stabilize_many(pipeline: &Pipeline, inputs: &[&[u8]]) -> Vec<Result<Stabilized>> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|input| pipeline.stabilize(input))
        .collect()
}

/// Stabilizes every input independently.
#[cfg(not(feature = "parallel"))]
pub fn stabilize_many(pipeline: &Pipeline, inputs: &[&[u8]]) -> Vec<Result<Stabilized>> {
    inputs
        .iter()
        .map(|input| pipeline.stabilize(input))
        .collect()
}

/// The outcome of stabilizing two candidate artifacts.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// `true` when both canonical outputs are byte-identical.
    pub reproducible: bool,
    /// First candidate.
    pub left: Stabilized,
    /// Second candidate.
    pub right: Stabilized,
}

/// Stabilizes two candidates with the same pipeline and compares the output.
///
/// # Errors
///
/// Fails if either candidate cannot be opened or serialized.
pub fn compare(pipeline: &Pipeline, left: &[u8], right: &[u8]) -> Result<Comparison> {
    #[cfg(feature = "parallel")]
    let (left, right) = rayon::join(|| pipeline.stabilize(left), || pipeline.stabilize(right));
    #[cfg(not(feature = "parallel"))]
    let (left, right) = (pipeline.stabilize(left), pipeline.stabilize(right));

    let (left, right) = (left?, right?);
    Ok(Comparison {
        reproducible: left.bytes == right.bytes,
        left,
        right,
    })
}
