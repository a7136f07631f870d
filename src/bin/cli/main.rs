//! CLI tool for canonicalizing build artifacts.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Reproducible-build artifact canonicalizer
#[derive(Parser)]
#[command(name = "canonzip")]
#[command(author, version, about = "Canonicalize JAR and ZIP artifacts for reproducible-build comparison", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress the per-pass report
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite an artifact into canonical form (alias: s)
    #[command(alias = "s")]
    Stabilize {
        /// Artifact to stabilize
        input: PathBuf,

        /// Where to write the canonical artifact
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Stabilizer to skip (repeatable)
        #[arg(short = 'd', long = "disable", value_name = "NAME")]
        disable: Vec<String>,

        /// Deflate level used when re-compressing entries (0-9)
        #[arg(short = 'l', long, default_value = "6")]
        level: u32,
    },

    /// Stabilize two artifacts and check them for byte equality (alias: c)
    #[command(alias = "c")]
    Compare {
        /// First candidate
        left: PathBuf,

        /// Second candidate
        right: PathBuf,

        /// Stabilizer to skip (repeatable)
        #[arg(short = 'd', long = "disable", value_name = "NAME")]
        disable: Vec<String>,
    },

    /// List the built-in stabilizers
    Stabilizers,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    env_logger::init();

    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Stabilize {
            input,
            output,
            disable,
            level,
        } => commands::stabilize(&commands::StabilizeConfig {
            input: &input,
            output: &output,
            disable: &disable,
            level,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Compare {
            left,
            right,
            disable,
        } => commands::compare(&left, &right, &disable, cli.format, cli.quiet),

        Commands::Stabilizers => commands::stabilizers(cli.format),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
