use log::info;

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::types::AppResult;
use crate::types::config::CommandsConfig;

pub fn unit_test_command(cmds: &CommandsConfig) -> CommandSpec {
    CommandSpec::new(cmds.python()).args(["setup.py", "test"])
}

pub async fn execute_unit_tests<R: CommandRunner>(
    runner: &R,
    cmds: &CommandsConfig,
) -> AppResult<i32> {
    info!("Running `ptr` unit tests");
    runner.run(&unit_test_command(cmds)).await
}
