//! crossent - Cross-Entropy Method optimizer CLI
//!
//! Usage:
//!   crossent run --function sphere --dim 5                  # 100 generations
//!   crossent run -f rosenbrock --noise linear --noise-a 1 --noise-b -0.01
//!   crossent run --max-evaluations 5000 --csv run.csv       # evaluation budget
//!   crossent run --checkpoint state.json --seed 7           # save final state
//!   crossent run --resume state.json -g 50                  # continue a run
//!   crossent info state.json                                # inspect a checkpoint

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{info, run};

/// crossent - Cross-Entropy Method optimizer
///
/// Minimize benchmark functions with a diagonal Gaussian CEM and an
/// optional variance noise schedule.
#[derive(Parser)]
#[command(name = "crossent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (per-generation debug logs)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a benchmark function
    Run(run::RunArgs),

    /// Display checkpoint contents
    Info {
        /// Checkpoint file
        #[arg(value_name = "FILE")]
        checkpoint: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Logs go to stderr; `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run::run(&args),
        Commands::Info { checkpoint, json } => info::run(&checkpoint, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
