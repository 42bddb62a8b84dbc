use std::cell::RefCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use ptrci::types::config::{CliOverrides, Config, load_with_overrides};
use ptrci::types::mode::CiEnv;
use ptrci::types::{AppError, AppResult};
use ptrci::{CommandRunner, CommandSpec, execute_ci};
use tempfile::tempdir;

/// Records every command and answers with canned results
struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    exit_code: i32,
    /// Written to the `--stats-file` argument when ptr is "run"
    stats: Option<String>,
}

impl RecordingRunner {
    fn new(exit_code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code,
            stats: None,
        }
    }

    fn writing_stats(mut self, stats: &str) -> Self {
        self.stats = Some(stats.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> AppResult<i32> {
        self.calls.borrow_mut().push(spec.clone());
        if let Some(stats) = &self.stats {
            let flag = spec.args.iter().position(|a| a == "--stats-file");
            if let Some(path) = flag.and_then(|i| spec.args.get(i + 1)) {
                std::fs::write(path, stats)?;
            }
        }
        Ok(self.exit_code)
    }

    async fn capture(&self, spec: &CommandSpec) -> AppResult<String> {
        self.calls.borrow_mut().push(spec.clone());
        Ok("Python 3.12.1\n".to_string())
    }
}

/// Fails every probe, succeeds every run
struct NoPythonRunner;

impl CommandRunner for NoPythonRunner {
    async fn run(&self, _spec: &CommandSpec) -> AppResult<i32> {
        Ok(0)
    }

    async fn capture(&self, spec: &CommandSpec) -> AppResult<String> {
        Err(AppError::Spawn {
            program: spec.program.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

const HEALTHY_STATS: &str = r#"{
    "total.fails": 0,
    "total.timeouts": 0,
    "total.setup_pys": 1,
    "pct.setup_py_ptr_enabled": 100,
    "suite.ptr_coverage.file.ptr.py": 91,
    "suite.ptr_coverage.file.ptr_tests.py": 99,
    "suite.ptr_coverage.file.ptr_tests_fixtures.py": 100,
    "suite.ptr_coverage.file.TOTAL": 94
}"#;

fn config_with_stats(stats_file: &Path) -> Config {
    load_with_overrides(
        None,
        &CliOverrides {
            stats_file: Some(stats_file.to_path_buf()),
            ..Default::default()
        },
    )
    .expect("default config loads")
}

fn env(vars: &[(&str, &str)]) -> CiEnv {
    CiEnv::from_vars(vars.iter().copied())
}

#[tokio::test]
async fn default_mode_runs_setup_py_tests() {
    let runner = RecordingRunner::new(0);
    let cfg = Config::default();

    let code = execute_ci(&runner, &env(&[]), &cfg, false).await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(runner.calls(), vec!["python3 -V", "python setup.py test"]);
}

#[tokio::test]
async fn unit_test_exit_code_is_passed_through() {
    let runner = RecordingRunner::new(2);
    let code = execute_ci(&runner, &env(&[]), &Config::default(), false)
        .await
        .unwrap();
    assert_eq!(code, 2);
}

#[tokio::test]
async fn type_check_mode_runs_pyre() {
    let runner = RecordingRunner::new(1);
    let vars = env(&[("PYRE_CHECK", "1"), ("PTR_INTEGRATION", "1")]);

    let code = execute_ci(&runner, &vars, &Config::default(), false)
        .await
        .unwrap();

    assert_eq!(code, 1);
    assert_eq!(
        runner.calls(),
        vec!["python3 -V", "pyre --source-directory . check"]
    );
}

#[tokio::test]
async fn integration_mode_runs_ptr_and_validates_stats() {
    let dir = tempdir().unwrap();
    let stats_file = dir.path().join("ptr_ci_stats");
    let runner = RecordingRunner::new(0).writing_stats(HEALTHY_STATS);

    let code = execute_ci(
        &runner,
        &env(&[("CI_ENV", "PTR_INTEGRATION")]),
        &config_with_stats(&stats_file),
        false,
    )
    .await
    .unwrap();

    assert_eq!(code, 0);
    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].program, "python");
    let expected: Vec<OsString> = vec![
        "ptr.py".into(),
        "-d".into(),
        "--print-cov".into(),
        "--stats-file".into(),
        stats_file.clone().into_os_string(),
    ];
    assert_eq!(calls[1].args, expected);
}

#[tokio::test]
async fn integration_forwards_virtual_env() {
    let dir = tempdir().unwrap();
    let stats_file = dir.path().join("ptr_ci_stats");
    let runner = RecordingRunner::new(0).writing_stats(HEALTHY_STATS);

    execute_ci(
        &runner,
        &env(&[("PTR_INTEGRATION", "1"), ("VIRTUAL_ENV", "/venvs/ptr")]),
        &config_with_stats(&stats_file),
        false,
    )
    .await
    .unwrap();

    let calls = runner.calls.borrow();
    let args = &calls[1].args;
    let n = args.len();
    assert_eq!(args[n - 2], OsString::from("--venv"));
    assert_eq!(PathBuf::from(&args[n - 1]), PathBuf::from("/venvs/ptr"));
}

#[tokio::test]
async fn integration_adds_runner_code_and_stats_errors() {
    let dir = tempdir().unwrap();
    let stats_file = dir.path().join("ptr_ci_stats");
    let runner = RecordingRunner::new(1).writing_stats(
        r#"{"total.fails": 2, "total.timeouts": 1, "total.setup_pys": 1, "pct.setup_py_ptr_enabled": 100}"#,
    );

    let code = execute_ci(
        &runner,
        &env(&[("PTR_INTEGRATION", "")]),
        &config_with_stats(&stats_file),
        false,
    )
    .await
    .unwrap();

    assert_eq!(code, 1 + 3);
}

#[tokio::test]
async fn integration_without_stats_reports_missing() {
    let dir = tempdir().unwrap();
    let stats_file = dir.path().join("never_written");
    let runner = RecordingRunner::new(0);

    let code = execute_ci(
        &runner,
        &env(&[("PTR_INTEGRATION", "1")]),
        &config_with_stats(&stats_file),
        false,
    )
    .await
    .unwrap();

    assert_eq!(code, 68);
}

#[tokio::test]
async fn configured_commands_are_used() {
    let dir = tempdir().unwrap();
    let cfg_path = dir.path().join("ptrci.toml");
    std::fs::write(
        &cfg_path,
        "[commands]\npython = \"python3.12\"\npython_probe = \"python3.12\"\n",
    )
    .unwrap();
    let cfg = load_with_overrides(Some(cfg_path.as_path()), &CliOverrides::default()).unwrap();
    let runner = RecordingRunner::new(0);

    execute_ci(&runner, &env(&[]), &cfg, true).await.unwrap();

    assert_eq!(
        runner.calls(),
        vec!["python3.12 -V", "python3.12 setup.py test"]
    );
}

#[tokio::test]
async fn failed_version_probe_does_not_stop_the_run() {
    let code = execute_ci(&NoPythonRunner, &env(&[]), &Config::default(), false)
        .await
        .unwrap();
    assert_eq!(code, 0);
}
