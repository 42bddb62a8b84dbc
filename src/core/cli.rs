use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// With no subcommand, runs the CI action selected by PYRE_CHECK,
/// PTR_INTEGRATION or CI_ENV (unit tests by default).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    /// All child processes will be run in this directory.
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    /// Where the integration run writes its stats report.
    /// Replaces config [integration].stats_file if provided.
    #[arg(long = "stats-file", global = true)]
    pub stats_file: Option<PathBuf>,

    /// Log every environment variable before dispatching
    #[arg(long)]
    pub show_env: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an existing stats report and exit with its error count
    CheckStats(CheckStatsArgs),

    /// Print the effective configuration
    PrintConfig(PrintConfigArgs),
}

#[derive(Parser, Debug)]
pub struct CheckStatsArgs {
    /// Stats JSON written by `ptr --stats-file`
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct PrintConfigArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_ci() {
        let args = Args::try_parse_from(["ptrci"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.show_env);
    }

    #[test]
    fn check_stats_takes_a_path() {
        let args =
            Args::try_parse_from(["ptrci", "--log.level", "debug", "check-stats", "/tmp/s"])
                .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Some(Commands::CheckStats(a)) => assert_eq!(a.path, PathBuf::from("/tmp/s")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
