use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use strum::{Display, EnumIter};

/// Returned when the report file does not exist
pub const MISSING_REPORT_CODE: i32 = 68;
/// Returned when the report file is not valid JSON
pub const MALFORMED_REPORT_CODE: i32 = 69;

/// Substring marking a per-file (or total) coverage counter
pub const COVERAGE_KEY_MARKER: &str = "_coverage.";
/// ptr tracks coverage for its 3 modules plus a total
pub const EXPECTED_COVERAGE_KEYS: usize = 4;

/// The JSON stats document ptr writes with `--stats-file`
#[derive(Debug, Clone, Deserialize)]
pub struct StatsReport {
    #[serde(rename = "total.fails", deserialize_with = "lenient_int")]
    pub total_fails: i64,
    #[serde(rename = "total.timeouts", deserialize_with = "lenient_int")]
    pub total_timeouts: i64,
    #[serde(rename = "total.setup_pys", deserialize_with = "lenient_int")]
    pub total_setup_pys: i64,
    #[serde(rename = "pct.setup_py_ptr_enabled", deserialize_with = "lenient_int")]
    pub pct_setup_py_ptr_enabled: i64,
    /// Every other key, including the coverage counters
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl StatsReport {
    pub fn fail_count(&self) -> i64 {
        self.total_fails.saturating_add(self.total_timeouts)
    }

    pub fn coverage_key_count(&self) -> usize {
        self.extra
            .keys()
            .filter(|key| key.contains(COVERAGE_KEY_MARKER))
            .count()
    }

    /// Structural checks, in reporting order. Only meaningful when no test failed.
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut found = Vec::new();
        if self.total_setup_pys > 1 {
            found.push(Anomaly::MultipleSetupPys);
        }
        if self.pct_setup_py_ptr_enabled != 100 {
            found.push(Anomaly::SetupPysNotAllEnabled);
        }
        if self.coverage_key_count() != EXPECTED_COVERAGE_KEYS {
            found.push(Anomaly::CoverageKeysMissing);
        }
        found
    }
}

/// A run configuration problem detected while no tests failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Anomaly {
    #[strum(to_string = "Somehow we had more than 1 setup.py - What?")]
    MultipleSetupPys,
    #[strum(to_string = "We didn't test all setup.py files ...")]
    SetupPysNotAllEnabled,
    #[strum(to_string = "We didn't get coverage stats for all ptr files + total")]
    CoverageKeysMissing,
}

/// Result of validating a stats report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsOutcome {
    Missing,
    Malformed(String),
    Failures(i64),
    Checked(Vec<Anomaly>),
}

impl StatsOutcome {
    /// Exit code contribution of this outcome
    pub fn error_count(&self) -> i32 {
        match self {
            StatsOutcome::Missing => MISSING_REPORT_CODE,
            StatsOutcome::Malformed(_) => MALFORMED_REPORT_CODE,
            StatsOutcome::Failures(n) => (*n).clamp(i32::MIN.into(), i32::MAX.into()) as i32,
            StatsOutcome::Checked(anomalies) => anomalies.len() as i32,
        }
    }
}

/// Accept anything an integer conversion would: ints, bools, floats (truncated) and numeric strings
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientInt;

    impl Visitor<'_> for LenientInt {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, a bool, a float or an integer string")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<i64, E> {
            Ok(i64::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.abs() < i64::MAX as f64 {
                Ok(v.trunc() as i64)
            } else {
                Err(E::custom(format!("number {v} out of range")))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse::<i64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LenientInt)
}
