//! `oxt` — reconcile the legacy OxeTech Lab export with the live store.

mod exit_codes;
mod recon;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

/// Structured CLI failure: exit code + message, with an optional hint.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Parser)]
#[command(name = "oxt", about = "OxeTech Lab legacy/live class reconciliation", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  oxt run recon.toml
  oxt run recon.toml --json
  oxt run recon.toml --output merged.json")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Invalidate the cached legacy export before running
        #[arg(long)]
        refresh: bool,
    },

    /// Validate a recon config without running
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output, refresh } => {
            recon::cmd_run(config, json, output, refresh)
        }
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS as i32),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint:  {}", hint);
            }
            std::process::exit(err.code as i32);
        }
    }
}
