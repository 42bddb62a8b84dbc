use std::env;

use clap::Parser;
use log::debug;

use crate::core::cli::{Args, Commands};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::core::runner::SystemRunner;
use crate::core::validator::validate_stats;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, config, init_with_overrides};
use crate::types::mode::CiEnv;

/// Highest code a process can report without wrapping
const MAX_EXIT_CODE: i32 = 255;

/// Turn an accumulated error count into a process exit code.
/// Any nonzero count stays nonzero: large counts saturate at 255 and negative
/// ones wrap the way the OS truncates them (-3 exits 253).
pub fn to_exit_code(code: i32) -> i32 {
    match code {
        0..=MAX_EXIT_CODE => code,
        c if c > MAX_EXIT_CODE => MAX_EXIT_CODE,
        c => match c.rem_euclid(MAX_EXIT_CODE + 1) {
            0 => MAX_EXIT_CODE,
            wrapped => wrapped,
        },
    }
}

/// Parse arguments, load config and logging, then run the selected command.
/// Returns the process exit code.
pub async fn run_main() -> AppResult<i32> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        env::set_current_dir(cwd_arg.canonicalize()?)?;
    }

    // Snapshot the environment before anything else can touch it
    let ci_env = CiEnv::from_process();

    let cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        stats_file: args.stats_file.clone(),
    };

    // Initialize configuration (file, then CLI overrides)
    init_with_overrides(&cli_overrides)?;

    // Initialize logging after config so level/color are applied
    init_logging();

    debug!("Current working directory: {}", env::current_dir()?.display());
    debug!("Selected mode: {}", ci_env.mode);

    let code = match args.command {
        None => cmds::execute_ci(&SystemRunner, &ci_env, config(), args.show_env).await?,
        Some(Commands::CheckStats(check_args)) => validate_stats(&check_args.path)?,
        Some(Commands::PrintConfig(print_args)) => {
            cmds::execute_print_config(config(), &print_args.format)?;
            0
        }
    };

    Ok(to_exit_code(code))
}
