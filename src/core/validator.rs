use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{error, info};

use crate::types::stats::{StatsOutcome, StatsReport};
use crate::types::{AppError, AppResult};

/// Validate the stats report at `path` and return its exit code contribution.
///
/// The parsed report is echoed to stdout, pretty-printed with sorted keys, so
/// every CI run leaves a copy of its stats in the job log.
pub fn validate_stats(path: &Path) -> AppResult<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    Ok(check_stats(path, &mut out)?.error_count())
}

/// Typed form of [`validate_stats`], writing the report dump to `out`.
///
/// Missing or unparsable files are outcomes, not errors. A report that parses
/// but lacks one of the expected keys is an error.
pub fn check_stats<W: Write>(path: &Path, out: &mut W) -> AppResult<StatsOutcome> {
    if !path.is_file() {
        error!("{} stats file does not exist", path.display());
        return Ok(StatsOutcome::Missing);
    }

    let contents = fs::read(path)?;
    let value: serde_json::Value = match serde_json::from_slice(&contents) {
        Ok(value) => value,
        Err(e) => {
            error!("Stats JSON Error: {e}");
            return Ok(StatsOutcome::Malformed(e.to_string()));
        }
    };

    // serde_json maps are ordered by key, so this dump is key-sorted
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    out.flush()?;

    let report: StatsReport =
        serde_json::from_value(value).map_err(|source| AppError::StatsDecode {
            path: path.to_path_buf(),
            source,
        })?;

    let fail_count = report.fail_count();
    if fail_count != 0 {
        error!("Stats report {fail_count} fails/timeouts");
        return Ok(StatsOutcome::Failures(fail_count));
    }

    let anomalies = report.anomalies();
    for anomaly in &anomalies {
        error!("{anomaly}");
    }
    info!("Stats check found {} error(s)", anomalies.len());

    Ok(StatsOutcome::Checked(anomalies))
}
