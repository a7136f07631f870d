//! Per-run audit trail.

use std::fmt;

use super::Scope;
use crate::{Error, ErrorKind};

/// Why a stabilizer could not process its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Coarse error kind.
    pub kind: ErrorKind,
    /// Rendered error message.
    pub message: String,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// What a pass did to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Content was replaced.
    Modified,
    /// The transform ran and produced identical content.
    Unchanged,
    /// The entry was removed.
    Deleted,
    /// The entry was created.
    Added,
    /// The transform failed; the entry was left as it was.
    Failed(Failure),
}

impl EntryOutcome {
    /// Returns a short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
            Self::Deleted => "deleted",
            Self::Added => "added",
            Self::Failed(_) => "failed",
        }
    }

    /// Returns `true` if the archive changed for this entry.
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Modified | Self::Deleted | Self::Added)
    }
}

/// One entry touched by one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Entry name.
    pub entry: String,
    /// What happened.
    pub outcome: EntryOutcome,
}

/// Everything one stabilizer did during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Stabilizer name.
    pub stabilizer: String,
    /// Stabilizer scope.
    pub scope: Scope,
    /// Entries the pass visited, in visiting order.
    pub records: Vec<EntryRecord>,
    /// Set when an archive-scoped pass failed as a whole and was rolled back.
    pub error: Option<Failure>,
}

impl PassReport {
    pub(crate) fn new(stabilizer: &str, scope: Scope) -> Self {
        Self {
            stabilizer: stabilizer.to_string(),
            scope,
            records: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn record(&mut self, entry: impl Into<String>, outcome: EntryOutcome) {
        self.records.push(EntryRecord {
            entry: entry.into(),
            outcome,
        });
    }

    /// Returns the names of entries this pass changed.
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.outcome.is_change())
            .map(|r| r.entry.as_str())
    }

    /// Returns `true` if the pass or any of its entries failed.
    pub fn has_failures(&self) -> bool {
        self.error.is_some()
            || self
                .records
                .iter()
                .any(|r| matches!(r.outcome, EntryOutcome::Failed(_)))
    }
}

/// The audit trail of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilizeReport {
    /// One report per stabilizer, in execution order.
    pub passes: Vec<PassReport>,
}

impl StabilizeReport {
    /// Returns the report of the named stabilizer.
    pub fn pass(&self, stabilizer: &str) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.stabilizer == stabilizer)
    }

    /// Returns `true` if any pass recorded a failure.
    pub fn has_failures(&self) -> bool {
        self.passes.iter().any(PassReport::has_failures)
    }

    /// Iterates over `(stabilizer, entry, failure)` triples. The entry is
    /// `None` for a failure of a whole archive-scoped pass.
    pub fn failures(&self) -> impl Iterator<Item = (&str, Option<&str>, &Failure)> {
        self.passes.iter().flat_map(|pass| {
            let pass_error = pass
                .error
                .as_ref()
                .map(|e| (pass.stabilizer.as_str(), None, e));
            let entry_errors = pass.records.iter().filter_map(move |r| match &r.outcome {
                EntryOutcome::Failed(e) => Some((pass.stabilizer.as_str(), Some(r.entry.as_str()), e)),
                _ => None,
            });
            pass_error.into_iter().chain(entry_errors)
        })
    }

    /// Returns the number of entry changes across all passes.
    pub fn change_count(&self) -> usize {
        self.passes.iter().map(|p| p.changed().count()).sum()
    }
}

impl fmt::Display for StabilizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pass in &self.passes {
            write!(f, "{} ({})", pass.stabilizer, pass.scope)?;
            if let Some(error) = &pass.error {
                write!(f, " rolled back: {error}")?;
            }
            writeln!(f)?;
            for record in &pass.records {
                match &record.outcome {
                    EntryOutcome::Failed(failure) => {
                        writeln!(f, "  failed     {} ({failure})", record.entry)?
                    }
                    outcome => writeln!(f, "  {:<10} {}", outcome.label(), record.entry)?,
                }
            }
        }
        Ok(())
    }
}
