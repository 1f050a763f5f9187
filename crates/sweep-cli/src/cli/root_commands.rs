use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Enumerate the inventory and report hostnames with shared hardware addresses.
    Scan,
    /// Scan, then delete every stale duplicate identity. The newest identity
    /// per hostname survives.
    Purge(PurgeArgs),
}

/// Arguments for `msw purge`.
#[derive(Clone, Debug, Args)]
pub struct PurgeArgs {
    /// Report the would-be targets and stop; nothing is deleted.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the interactive confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,
}
