use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `msw` binary.
#[derive(Debug, Parser)]
#[command(
    name = "msw",
    version,
    about = "MacSweep - stale duplicate cleanup for the device inventory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["msw", "--format", "table", "--verbose", "scan"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Scan));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["msw", "purge", "--format", "json", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Purge(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["msw", "--format", "xml", "scan"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_accepts_all_supported_values() {
        for value in ["json", "table"] {
            let cli = Cli::try_parse_from(["msw", "--format", value, "scan"])
                .expect("cli should parse");
            assert!(matches!(cli.command, Commands::Scan));
        }
    }

    #[test]
    fn purge_flags_parse() {
        let cli = Cli::try_parse_from(["msw", "purge", "--dry-run", "-y"])
            .expect("cli should parse");

        let Commands::Purge(args) = cli.command else {
            panic!("expected purge command");
        };
        assert!(args.dry_run);
        assert!(args.yes);
    }

    #[test]
    fn purge_defaults_to_interactive_wet_run() {
        let cli = Cli::try_parse_from(["msw", "purge"]).expect("cli should parse");

        let Commands::Purge(args) = cli.command else {
            panic!("expected purge command");
        };
        assert!(!args.dry_run);
        assert!(!args.yes);
    }
}
