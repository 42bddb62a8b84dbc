use std::collections::BTreeMap;
use std::path::PathBuf;

use strum::Display;

/// Presence of this variable selects the type-check action
pub const TYPE_CHECK_VAR: &str = "PYRE_CHECK";
/// Presence of this variable selects the integration action (Travis)
pub const INTEGRATION_VAR: &str = "PTR_INTEGRATION";
/// CI-provided variable compared against [`INTEGRATION_SENTINEL`] (Azure)
pub const CI_ENV_VAR: &str = "CI_ENV";
pub const INTEGRATION_SENTINEL: &str = "PTR_INTEGRATION";
/// Forwarded to ptr as `--venv` during integration runs
pub const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";

/// The three disjoint CI actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    TypeCheck,
    Integration,
    UnitTest,
}

impl Mode {
    /// Pick the action in priority order: type check, integration, unit tests.
    pub fn select<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(TYPE_CHECK_VAR).is_some() {
            return Mode::TypeCheck;
        }

        if lookup(INTEGRATION_VAR).is_some()
            || lookup(CI_ENV_VAR).is_some_and(|v| v == INTEGRATION_SENTINEL)
        {
            return Mode::Integration;
        }

        Mode::UnitTest
    }
}

/// Everything the driver needs from the process environment, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiEnv {
    pub mode: Mode,
    pub virtual_env: Option<PathBuf>,
    vars: BTreeMap<String, String>,
}

impl CiEnv {
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        }))
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mode = Mode::select(|name| vars.get(name).cloned());
        let virtual_env = vars.get(VIRTUAL_ENV_VAR).map(PathBuf::from);
        Self {
            mode,
            virtual_env,
            vars,
        }
    }

    /// All captured variables, sorted by name
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
