use crate::core::cmds::integration::execute_integration;
use crate::core::cmds::probe::{dump_environment, report_python_version};
use crate::core::cmds::typecheck::execute_type_check;
use crate::core::cmds::unit::execute_unit_tests;
use crate::core::runner::CommandRunner;
use crate::types::AppResult;
use crate::types::config::Config;
use crate::types::mode::{CiEnv, Mode};

/// Probe the interpreter, then run the action selected by the environment
pub async fn execute_ci<R: CommandRunner>(
    runner: &R,
    env: &CiEnv,
    cfg: &Config,
    show_env: bool,
) -> AppResult<i32> {
    let cmds = cfg.commands();

    report_python_version(runner, cmds.python_probe()).await;

    if show_env {
        dump_environment(env);
    }

    match env.mode {
        Mode::TypeCheck => execute_type_check(runner, &cmds).await,
        Mode::Integration => {
            let stats_file = cfg.integration().stats_file();
            execute_integration(runner, &cmds, &stats_file, env.virtual_env.as_deref()).await
        }
        Mode::UnitTest => execute_unit_tests(runner, &cmds).await,
    }
}
