use log::info;

use crate::types::AppResult;
use crate::types::config::Config;

pub fn execute_print_config(cfg: &Config, format: &str) -> AppResult<()> {
    let effective_config = cfg.to_effective();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&effective_config)?);
        return Ok(());
    }

    let log = effective_config.log();
    info!("Effective Configuration:");
    info!("");
    info!("Log:");
    info!("  level: {}", log.level());
    match log.color() {
        Some(true) => info!("  color: on"),
        Some(false) => info!("  color: off"),
        None => info!("  color: auto"),
    }

    let cmds = effective_config.commands();
    info!("");
    info!("Commands:");
    info!("  python: {}", cmds.python());
    info!("  python_probe: {}", cmds.python_probe());
    info!("  type_checker: {}", cmds.type_checker());
    info!("  entry_point: {}", cmds.entry_point());

    info!("");
    info!("Integration:");
    info!(
        "  stats_file: {}",
        effective_config.integration().stats_file().display()
    );

    Ok(())
}
