use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use triplestore_cli::cli::Cli;
use triplestore_cli::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let verbose = cli.verbose;
    let mut out = BufWriter::new(io::stdout().lock());
    let summary = commands::run(cli, &mut out).await?;
    out.flush()?;

    if verbose {
        summary.print();
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
