//! Headless match-3 runner (default binary).
//!
//! Reads protocol lines on stdin and writes protocol lines on stdout. Logs go
//! to stderr, filtered by `MATCH3_LOG` (default `warn`).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use match3::adapter::{Session, SessionConfig};

fn main() -> Result<()> {
    init_logging();

    let config = SessionConfig::from_env()?;
    let mut session = Session::new(config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    // Greet with the starting board.
    for line in session.snapshot_line(0) {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        for out in session.handle_line(&line) {
            writeln!(stdout, "{out}").context("writing stdout")?;
        }
        stdout.flush()?;
    }

    tracing::info!(score = session.controller().score(), "input closed");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MATCH3_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
