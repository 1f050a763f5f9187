#![allow(dead_code)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use clap::Parser;

mod cli;
mod commands;
mod output;
mod progress;
mod prompt;
mod reports;
mod ui;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("msw error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = sweep_config::SweepConfig::load_with_dotenv()?;

    match cli.command {
        cli::Commands::Scan => commands::scan::handle(&config, &flags).await,
        cli::Commands::Purge(args) => commands::purge::handle(&args, &config, &flags).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MACSWEEP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
