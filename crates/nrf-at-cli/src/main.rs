//! atcodec - decode and encode nRF91 AT lines.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use nrf_at_cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    match run(&cli, stdin.lock(), &mut stdout, &mut stderr) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            tracing::debug!(failures, "finished with failed lines");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("atcodec: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
