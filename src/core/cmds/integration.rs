use std::path::Path;

use log::{info, warn};

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::core::validator::validate_stats;
use crate::types::AppResult;
use crate::types::config::CommandsConfig;

/// ptr running its own test suite, writing stats to `stats_file`
pub fn integration_command(
    cmds: &CommandsConfig,
    stats_file: &Path,
    virtual_env: Option<&Path>,
) -> CommandSpec {
    let spec = CommandSpec::new(cmds.python())
        .args([cmds.entry_point(), "-d", "--print-cov", "--stats-file"])
        .arg(stats_file);
    match virtual_env {
        Some(venv) => spec.arg("--venv").arg(venv),
        None => spec,
    }
}

/// Run ptr on itself, then validate the stats it wrote.
/// The result is ptr's exit code plus the validator's error count.
pub async fn execute_integration<R: CommandRunner>(
    runner: &R,
    cmds: &CommandsConfig,
    stats_file: &Path,
    virtual_env: Option<&Path>,
) -> AppResult<i32> {
    info!("Running `ptr` integration tests (aka run itself)");

    let code = runner
        .run(&integration_command(cmds, stats_file, virtual_env))
        .await?;
    if code != 0 {
        warn!("`ptr` exited with {code}");
    }

    let stats_errors = validate_stats(stats_file)?;
    Ok(code.saturating_add(stats_errors))
}
