//! vethpeer CLI
//!
//! Prints the host-side index and name of the veth peer of an interface inside
//! another process's network namespace, e.g. `7 veth123`.

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod run;

use cli::Cli;

fn main() {
    // Parse command-line arguments; usage errors share the runtime exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    // Logs go to stderr; stdout carries only the result
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = lookup(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn lookup(cli: &Cli) -> Result<()> {
    let config = run::config_from_args(cli)?;
    let link = run::execute(&config)?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        serde_json::to_writer(&mut stdout, &link)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{link}")?;
    }
    stdout.flush()?;

    Ok(())
}
