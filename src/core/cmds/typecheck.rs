use log::info;

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::types::AppResult;
use crate::types::config::CommandsConfig;

pub fn type_check_command(cmds: &CommandsConfig) -> CommandSpec {
    CommandSpec::new(cmds.type_checker()).args(["--source-directory", ".", "check"])
}

pub async fn execute_type_check<R: CommandRunner>(
    runner: &R,
    cmds: &CommandsConfig,
) -> AppResult<i32> {
    info!("Running `{}` type checking", cmds.type_checker());
    runner.run(&type_check_command(cmds)).await
}
