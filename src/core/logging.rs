use std::io;
use std::str::FromStr;

use console::Style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => Style::new().red().bold(),
        Level::Warn => Style::new().yellow(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().blue(),
        Level::Trace => Style::new().dim(),
    }
}

/// Route `log` records to stderr. Stdout is kept for the stats report dump.
pub fn init_logging() {
    let log_cfg = config().log();
    let level = LevelFilter::from_str(log_cfg.level()).unwrap_or(LevelFilter::Info);
    let color = colors_enabled();

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            if level == Level::Info {
                out.finish(format_args!("{message}"));
                return;
            }
            let tag = format!("[{}]", level.as_str().to_lowercase());
            let tag = level_style(level).force_styling(color).apply_to(tag);
            if level >= Level::Debug {
                out.finish(format_args!(
                    "{} {} {}: {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    tag,
                    record.target(),
                    message
                ));
            } else {
                out.finish(format_args!("{tag} {message}"));
            }
        })
        .level(level)
        .chain(io::stderr())
        .apply();

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}
