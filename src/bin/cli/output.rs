//! Output formatting for CLI operations.

use canonzip::{Comparison, EntryOutcome, StabilizeReport, Stabilized, Stabilizer};
use serde_json::{Value, json};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the result of stabilizing one artifact
    fn format_stabilized(&self, input: &str, output: &str, result: &Stabilized, quiet: bool) -> String;

    /// Formats the result of comparing two artifacts
    fn format_comparison(&self, left: &str, right: &str, comparison: &Comparison, quiet: bool) -> String;

    /// Formats the list of available stabilizers
    fn format_stabilizers(&self, stabilizers: &[Stabilizer]) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_stabilized(&self, input: &str, output: &str, result: &Stabilized, quiet: bool) -> String {
        let mut out = String::new();
        if !quiet {
            out.push_str(&result.report.to_string());
            out.push_str(&"-".repeat(70));
            out.push('\n');
        }
        out.push_str(&format!(
            "{} -> {} ({}, {} changes, {} failures)\n",
            input,
            output,
            humanize_bytes(result.bytes.len() as u64),
            result.report.change_count(),
            result.report.failures().count()
        ));
        out.push_str(&format!("sha256 {}\n", result.digest()));
        out
    }

    fn format_comparison(&self, left: &str, right: &str, comparison: &Comparison, quiet: bool) -> String {
        let mut out = String::new();
        for (path, side) in [(left, &comparison.left), (right, &comparison.right)] {
            out.push_str(&format!("{}  {}\n", side.digest(), path));
            if !quiet {
                for line in side.report.to_string().lines() {
                    out.push_str(&format!("    {line}\n"));
                }
            }
        }
        if comparison.reproducible {
            out.push_str("Reproducible: canonical artifacts are identical\n");
        } else {
            out.push_str("Not reproducible: canonical artifacts differ\n");
        }
        out
    }

    fn format_stabilizers(&self, stabilizers: &[Stabilizer]) -> String {
        let mut out = format!("{:<24} {:<8} {}\n", "Name", "Scope", "Target");
        out.push_str(&"-".repeat(70));
        out.push('\n');
        for stabilizer in stabilizers {
            out.push_str(&format!(
                "{:<24} {:<8} {}\n",
                stabilizer.name(),
                stabilizer.scope().to_string(),
                stabilizer.target()
            ));
        }
        out
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_stabilized(&self, input: &str, output: &str, result: &Stabilized, quiet: bool) -> String {
        let mut obj = json!({
            "input": input,
            "output": output,
            "size": result.bytes.len(),
            "sha256": result.digest(),
            "changes": result.report.change_count(),
            "failures": result.report.failures().count(),
        });
        if !quiet {
            obj["passes"] = report_json(&result.report);
        }

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_comparison(&self, left: &str, right: &str, comparison: &Comparison, quiet: bool) -> String {
        let side = |path: &str, result: &Stabilized| {
            let mut obj = json!({
                "path": path,
                "sha256": result.digest(),
                "size": result.bytes.len(),
            });
            if !quiet {
                obj["passes"] = report_json(&result.report);
            }
            obj
        };
        let obj = json!({
            "reproducible": comparison.reproducible,
            "left": side(left, &comparison.left),
            "right": side(right, &comparison.right),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_stabilizers(&self, stabilizers: &[Stabilizer]) -> String {
        let items: Vec<_> = stabilizers
            .iter()
            .map(|s| {
                json!({
                    "name": s.name(),
                    "scope": s.scope().to_string(),
                    "target": s.target(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }
}

fn report_json(report: &StabilizeReport) -> Value {
    report
        .passes
        .iter()
        .map(|pass| {
            json!({
                "stabilizer": pass.stabilizer,
                "scope": pass.scope.to_string(),
                "error": pass.error.as_ref().map(|e| e.to_string()),
                "entries": pass.records.iter().map(|r| {
                    let error = match &r.outcome {
                        EntryOutcome::Failed(failure) => Some(failure.to_string()),
                        _ => None,
                    };
                    json!({"entry": r.entry, "outcome": r.outcome.label(), "error": error})
                }).collect::<Vec<_>>(),
            })
        })
        .collect()
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonzip::stabilize::builtin;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(512), "512 B");
        assert_eq!(humanize_bytes(2048), "2.0 KB");
        assert_eq!(humanize_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_stabilizer_listing() {
        let stabilizers = builtin::all();
        let human = HumanFormatter.format_stabilizers(&stabilizers);
        assert!(human.contains("build-metadata"));
        assert!(human.contains("delete /"));

        let json: Value = serde_json::from_str(&JsonFormatter.format_stabilizers(&stabilizers)).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(3));
        assert_eq!(json[2]["scope"], "archive");
    }
}
