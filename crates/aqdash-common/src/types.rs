//! Shared data model: hourly readings, the loaded dataset and analysis knobs.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// English month names in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The 16-point compass rose, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Returns the English name of a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
}

/// Formats an hour of day (0-23) on the 12-hour clock, e.g. `0 -> "12 AM"`.
pub fn hour_label(hour: u32) -> Option<String> {
    match hour {
        0 => Some("12 AM".to_string()),
        1..=11 => Some(format!("{hour} AM")),
        12 => Some("12 PM".to_string()),
        13..=23 => Some(format!("{} PM", hour - 12)),
        _ => None,
    }
}

/// Position of a wind-direction label on the compass rose.
pub fn compass_index(label: &str) -> Option<usize> {
    COMPASS_POINTS.iter().position(|point| *point == label)
}

/// The numeric measurement columns of a reading, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "DEWP")]
    Dewp,
    #[serde(rename = "RAIN")]
    Rain,
    #[serde(rename = "WSPM")]
    Wspm,
}

impl Variable {
    /// All variables in canonical column order.
    pub const ALL: [Variable; 11] = [
        Variable::Pm25,
        Variable::Pm10,
        Variable::So2,
        Variable::No2,
        Variable::Co,
        Variable::O3,
        Variable::Temp,
        Variable::Pres,
        Variable::Dewp,
        Variable::Rain,
        Variable::Wspm,
    ];

    /// Exact (case-sensitive) CSV header of this column.
    pub const fn column(self) -> &'static str {
        match self {
            Variable::Pm25 => "PM2.5",
            Variable::Pm10 => "PM10",
            Variable::So2 => "SO2",
            Variable::No2 => "NO2",
            Variable::Co => "CO",
            Variable::O3 => "O3",
            Variable::Temp => "TEMP",
            Variable::Pres => "PRES",
            Variable::Dewp => "DEWP",
            Variable::Rain => "RAIN",
            Variable::Wspm => "WSPM",
        }
    }

    /// Position in [`Variable::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One hourly row of the raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    /// Timestamp assembled from `year`, `month`, `day` and `hour`.
    pub date: NaiveDateTime,
    /// Measurements indexed by [`Variable::index`]; `None` marks a missing value.
    pub values: [Option<f64>; 11],
    /// Wind direction label, e.g. `"NNE"`.
    pub wd: Option<String>,
}

impl Reading {
    /// Value of one measurement column.
    pub fn value(&self, variable: Variable) -> Option<f64> {
        self.values[variable.index()]
    }

    /// PM2.5 concentration in ug/m^3.
    pub fn pm25(&self) -> Option<f64> {
        self.value(Variable::Pm25)
    }

    /// Calendar day of the reading.
    pub fn day_date(&self) -> NaiveDate {
        self.date.date()
    }
}

/// An immutable snapshot of a loaded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    readings: Vec<Reading>,
}

impl Dataset {
    /// Wraps already-parsed readings.
    pub fn new(source: impl Into<PathBuf>, readings: Vec<Reading>) -> Self {
        Self {
            source: source.into(),
            readings,
        }
    }

    /// Path the readings were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Earliest and latest timestamps, regardless of row order.
    pub fn date_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.iter().map(|r| r.date).min()?;
        let last = self.readings.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

/// How the daily series handles days without a median before decomposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Refuse to decompose a series with missing days.
    #[default]
    Reject,
    /// Linearly interpolate interior gaps, extend edge gaps with the nearest value.
    Interpolate,
}

impl FromStr for GapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "interpolate" => Ok(Self::Interpolate),
            other => Err(format!("unknown gap policy '{other}' (expected reject or interpolate)")),
        }
    }
}

/// Ordering of the wind-direction summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindOrder {
    /// Clockwise from north; unknown labels follow lexically.
    #[default]
    Compass,
    /// Byte-wise label order.
    Lexical,
}

impl FromStr for WindOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compass" => Ok(Self::Compass),
            "lexical" => Ok(Self::Lexical),
            other => Err(format!("unknown wind order '{other}' (expected compass or lexical)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label(0).as_deref(), Some("12 AM"));
        assert_eq!(hour_label(1).as_deref(), Some("1 AM"));
        assert_eq!(hour_label(11).as_deref(), Some("11 AM"));
        assert_eq!(hour_label(12).as_deref(), Some("12 PM"));
        assert_eq!(hour_label(13).as_deref(), Some("1 PM"));
        assert_eq!(hour_label(23).as_deref(), Some("11 PM"));
        assert_eq!(hour_label(24), None);
    }

    #[test]
    fn test_variable_columns_follow_canonical_order() {
        let columns: Vec<&str> = Variable::ALL.iter().map(|v| v.column()).collect();
        assert_eq!(
            columns,
            ["PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP", "PRES", "DEWP", "RAIN", "WSPM"]
        );
        for (i, variable) in Variable::ALL.iter().enumerate() {
            assert_eq!(variable.index(), i);
        }
    }

    #[test]
    fn test_compass_index() {
        assert_eq!(compass_index("N"), Some(0));
        assert_eq!(compass_index("S"), Some(8));
        assert_eq!(compass_index("NNW"), Some(15));
        assert_eq!(compass_index("calm"), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Interpolate".parse::<GapPolicy>(), Ok(GapPolicy::Interpolate));
        assert_eq!("reject".parse::<GapPolicy>(), Ok(GapPolicy::Reject));
        assert!("fill".parse::<GapPolicy>().is_err());
        assert_eq!("LEXICAL".parse::<WindOrder>(), Ok(WindOrder::Lexical));
        assert!("polar".parse::<WindOrder>().is_err());
    }

    #[test]
    fn test_variable_serializes_as_column_name() {
        let json = serde_json::to_string(&Variable::Pm25).unwrap();
        assert_eq!(json, "\"PM2.5\"");
    }
}
