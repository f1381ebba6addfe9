//! Runs a command script against a skip list priority queue.
//!
//! Usage: `skiplist-pq <file_path>`. Logging goes to stderr and is controlled
//! by `RUST_LOG`.

use std::{fs, io};

use anyhow::{Context, Result, bail};
use skiplist_pq::command::Script;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        bail!("usage: skiplist-pq <file_path>");
    };

    let input = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let script: Script = input
        .parse()
        .with_context(|| format!("failed to parse {path}"))?;
    tracing::info!(path = %path, commands = script.commands.len(), alpha = script.alpha, "running script");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    script.execute(&mut out).context("failed to write output")?;
    Ok(())
}
