use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::{AppError, AppResult};

pub const CONFIG_FILENAME: &str = "ptrci.toml";

/// Name of the report file ptr writes during an integration run, inside the temp dir
const DEFAULT_STATS_FILENAME: &str = "ptr_ci_stats";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

/// Executables and entry points used for each CI action
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CommandsConfig {
    pub python: Option<String>,
    pub python_probe: Option<String>,
    pub type_checker: Option<String>,
    pub entry_point: Option<String>,
}

impl CommandsConfig {
    /// Interpreter used for `setup.py test` and the ptr integration run
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or("python")
    }

    /// Interpreter whose version is reported before dispatch
    pub fn python_probe(&self) -> &str {
        self.python_probe.as_deref().unwrap_or("python3")
    }

    pub fn type_checker(&self) -> &str {
        self.type_checker.as_deref().unwrap_or("pyre")
    }

    pub fn entry_point(&self) -> &str {
        self.entry_point.as_deref().unwrap_or("ptr.py")
    }

    pub fn to_effective(&self) -> Self {
        Self {
            python: Some(self.python().to_string()),
            python_probe: Some(self.python_probe().to_string()),
            type_checker: Some(self.type_checker().to_string()),
            entry_point: Some(self.entry_point().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct IntegrationConfig {
    pub stats_file: Option<PathBuf>,
}

impl IntegrationConfig {
    pub fn stats_file(&self) -> PathBuf {
        self.stats_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_STATS_FILENAME))
    }

    pub fn to_effective(&self) -> Self {
        Self {
            stats_file: Some(self.stats_file()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub log: Option<LogConfig>,
    pub commands: Option<CommandsConfig>,
    pub integration: Option<IntegrationConfig>,
}

impl Config {
    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn commands(&self) -> CommandsConfig {
        self.commands.clone().unwrap_or_default()
    }

    pub fn integration(&self) -> IntegrationConfig {
        self.integration.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            log: Some(self.log().to_effective()),
            commands: Some(self.commands().to_effective()),
            integration: Some(self.integration().to_effective()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub stats_file: Option<PathBuf>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Build the global config from the nearest config file and CLI overrides.
/// Only the first call has any effect.
pub fn init_with_overrides(overrides: &CliOverrides) -> AppResult<()> {
    let cfg = load_with_overrides(find_nearest_config_file().as_deref(), overrides)?;
    let _ = CONFIG.set(cfg);
    Ok(())
}

/// Merge defaults, the given config file (if any), then CLI overrides
pub fn load_with_overrides(path: Option<&Path>, overrides: &CliOverrides) -> AppResult<Config> {
    let mut cfg = Config::default();

    if let Some(path) = path {
        let file_cfg = read_config_file(path)?;
        apply_file_config(&mut cfg, &file_cfg);
    }

    apply_cli_overrides(&mut cfg, overrides);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> AppResult<Config> {
    let contents = fs::read_to_string(path)?;
    toml::from_str::<Config>(&contents).map_err(|source| AppError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    if let Some(file_cmds) = &file.commands {
        let mut cmds = cfg.commands.clone().unwrap_or_default();
        for (dst, src) in [
            (&mut cmds.python, &file_cmds.python),
            (&mut cmds.python_probe, &file_cmds.python_probe),
            (&mut cmds.type_checker, &file_cmds.type_checker),
            (&mut cmds.entry_point, &file_cmds.entry_point),
        ] {
            if let Some(value) = src
                && !value.trim().is_empty()
            {
                *dst = Some(value.clone());
            }
        }
        cfg.commands = Some(cmds);
    }

    if let Some(file_integration) = &file.integration
        && file_integration.stats_file.is_some()
    {
        let mut integration = cfg.integration.clone().unwrap_or_default();
        integration.stats_file = file_integration.stats_file.clone();
        cfg.integration = Some(integration);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    if let Some(stats_file) = &overrides.stats_file {
        let mut integration = cfg.integration.clone().unwrap_or_default();
        integration.stats_file = Some(stats_file.clone());
        cfg.integration = Some(integration);
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.exists())
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled_stderr(),
    }
}
