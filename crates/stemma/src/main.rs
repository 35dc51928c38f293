//! Stemma CLI binary.

use std::process::ExitCode;

use colored::Colorize;
use stemma::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `-v` is given.
const DEFAULT_FILTER: &str = "stemma=info,stemma_rows=info";

/// Main entry point for the stemma CLI.
///
/// Uses tokio's `current_thread` runtime; the only I/O is reading one data
/// file and writing to stdout.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v; logs go to stderr so JSON on stdout stays clean
    let filter = match cli.verbose {
        0 => DEFAULT_FILTER,
        1 => "stemma=debug,stemma_rows=debug",
        _ => "stemma=trace,stemma_rows=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting stemma CLI");

    match cli.execute().await {
        Ok(()) => {
            tracing::debug!("Stemma CLI completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
