use std::ffi::OsString;
use std::fmt;
use std::process::{ExitStatus, Stdio};

use log::debug;
use tokio::process::Command;

use crate::types::{AppError, AppResult};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Seam between the CI actions and the processes they launch
pub trait CommandRunner {
    /// Run to completion with inherited stdio and return the exit code
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = AppResult<i32>>;

    /// Run to completion and return captured stdout
    fn capture(&self, spec: &CommandSpec) -> impl Future<Output = AppResult<String>>;
}

/// Launches real child processes, one at a time, without any timeout
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).kill_on_drop(true);
        cmd
    }

    fn spawn_error(spec: &CommandSpec, source: std::io::Error) -> AppError {
        AppError::Spawn {
            program: spec.program.clone(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> AppResult<i32> {
        debug!("Running: {spec}");
        let status = Self::command(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::spawn_error(spec, e))?;
        let code = exit_code(status);
        debug!("`{}` exited with {code}", spec.program);
        Ok(code)
    }

    async fn capture(&self, spec: &CommandSpec) -> AppResult<String> {
        debug!("Capturing: {spec}");
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| Self::spawn_error(spec, e))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Exit code of a finished child; signal deaths map to 128 + signal on Unix
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("pyre").args(["--source-directory", ".", "check"]);
        assert_eq!(spec.to_string(), "pyre --source-directory . check");
    }

    #[cfg(unix)]
    #[test]
    fn signal_deaths_map_above_128() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status: terminated by SIGKILL (9)
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
        // Raw wait status: exited normally with code 3
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_reports_exit_codes() {
        let runner = SystemRunner;
        let code = runner
            .run(&CommandSpec::new("sh").args(["-c", "exit 5"]))
            .await
            .unwrap();
        assert_eq!(code, 5);

        let out = runner
            .capture(&CommandSpec::new("sh").args(["-c", "echo Python 3.12.1"]))
            .await
            .unwrap();
        assert_eq!(out.trim(), "Python 3.12.1");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = SystemRunner
            .run(&CommandSpec::new("ptrci-definitely-not-a-real-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Spawn { .. }), "got {err:?}");
    }
}
