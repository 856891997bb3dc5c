//! saferbq command-line entry point.
//!
//! Reads a JSON translation request from the file named by the first argument
//! (or stdin when absent or `-`) and writes the translated query to stdout.
//! Logs go to stderr.

use anyhow::{Context, Result};
use saferbq::request::{handle_request, read_request};
use saferbq::Config;
use std::fs::File;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", failure_report(&e));
            ExitCode::FAILURE
        }
    }
}

/// The stderr report for a failed run: the error chain, then a hint if any.
fn failure_report(e: &anyhow::Error) -> String {
    let mut report = format!("error: {e:#}");
    if let Some(hint) = e
        .downcast_ref::<saferbq::Error>()
        .and_then(saferbq::Error::suggestion)
    {
        report.push_str("\nhint: ");
        report.push_str(hint);
    }
    report
}

fn run() -> Result<String> {
    let config = Config::from_env()?;
    let input = read_input(std::env::args().nth(1).as_deref(), config.max_input_bytes)?;
    info!(bytes = input.len(), "Translating request");

    let output = handle_request(&input, &config)?;
    Ok(output)
}

fn read_input(path: Option<&str>, max_bytes: usize) -> Result<String> {
    let input = match path {
        None | Some("-") => read_request(std::io::stdin().lock(), max_bytes)?,
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open request file {path}"))?;
            read_request(file, max_bytes)?
        }
    };
    Ok(input)
}

/// Initialize tracing subscriber with stderr output.
///
/// Logs MUST go to stderr because stdout carries the translated query.
fn init_logging() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn,saferbq=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
