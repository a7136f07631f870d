//! Command implementations for the CLI tool.

use std::path::Path;

use canonzip::{Pipeline, SerializeOptions, stabilize::builtin};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// Configuration for the stabilize command.
pub struct StabilizeConfig<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub disable: &'a [String],
    pub level: u32,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Stabilize command implementation
pub fn stabilize(config: &StabilizeConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let pipeline = match build_pipeline(config.disable) {
        Ok(p) => p.with_serialize_options(SerializeOptions::new().deflate_level(config.level)),
        Err(code) => return code,
    };

    let input = match read_file(config.input) {
        Ok(bytes) => bytes,
        Err(code) => return code,
    };

    let result = match pipeline.stabilize(&input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error stabilizing {}: {}", config.input.display(), e);
            return error_to_exit_code(&e);
        }
    };

    if let Err(e) = std::fs::write(config.output, &result.bytes) {
        eprintln!("Error writing {}: {}", config.output.display(), e);
        return ExitCode::IoError;
    }

    print!(
        "{}",
        formatter.format_stabilized(
            &config.input.display().to_string(),
            &config.output.display().to_string(),
            &result,
            config.quiet,
        )
    );
    ExitCode::Success
}

/// Compare command implementation
pub fn compare(
    left: &Path,
    right: &Path,
    disable: &[String],
    format: OutputFormat,
    quiet: bool,
) -> ExitCode {
    let formatter = create_formatter(format);

    let pipeline = match build_pipeline(disable) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let left_bytes = match read_file(left) {
        Ok(bytes) => bytes,
        Err(code) => return code,
    };
    let right_bytes = match read_file(right) {
        Ok(bytes) => bytes,
        Err(code) => return code,
    };

    let comparison = match canonzip::compare(&pipeline, &left_bytes, &right_bytes) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!(
        "{}",
        formatter.format_comparison(
            &left.display().to_string(),
            &right.display().to_string(),
            &comparison,
            quiet,
        )
    );
    if comparison.reproducible {
        ExitCode::Success
    } else {
        ExitCode::NotReproducible
    }
}

/// Stabilizers command implementation
pub fn stabilizers(format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);
    print!("{}", formatter.format_stabilizers(&builtin::all()));
    ExitCode::Success
}

/// Builds the built-in pipeline minus the disabled stabilizers.
fn build_pipeline(disable: &[String]) -> Result<Pipeline, ExitCode> {
    let available = Pipeline::builtin();
    let mut pipeline = available.clone();
    for name in disable {
        if !available.names().contains(&name.as_str()) {
            eprintln!(
                "Error: unknown stabilizer '{}' (available: {})",
                name,
                available.names().join(", ")
            );
            return Err(ExitCode::BadArgs);
        }
        pipeline = pipeline.without(name);
    }
    Ok(pipeline)
}

fn read_file(path: &Path) -> Result<Vec<u8>, ExitCode> {
    std::fs::read(path).map_err(|e| {
        eprintln!("Error reading {}: {}", path.display(), e);
        ExitCode::IoError
    })
}
