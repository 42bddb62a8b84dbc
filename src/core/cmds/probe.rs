use log::{info, warn};

use crate::core::runner::{CommandRunner, CommandSpec};
use crate::types::mode::CiEnv;

/// Log the exact interpreter version. A failed probe does not stop the run.
pub async fn report_python_version<R: CommandRunner>(runner: &R, python: &str) {
    let spec = CommandSpec::new(python).arg("-V");
    match runner.capture(&spec).await {
        Ok(version) => info!("Using {}", version.trim()),
        Err(e) => warn!("Could not determine interpreter version: {e}"),
    }
}

pub fn dump_environment(env: &CiEnv) {
    info!("- Environment:");
    for (key, value) in env.vars() {
        info!("{key}: {value}");
    }
}
