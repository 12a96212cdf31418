//! The five dashboard sections and their fixed wording.

use serde::Serialize;
use std::fmt;

const CONCENTRATION_AXIS: &str = "PM2.5 concentration (ug/m^3)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Monthly,
    DailyTrend,
    Hourly,
    WindDirection,
    Correlation,
}

impl SectionId {
    /// Sections in page order.
    pub const ALL: [SectionId; 5] = [
        SectionId::Monthly,
        SectionId::DailyTrend,
        SectionId::Hourly,
        SectionId::WindDirection,
        SectionId::Correlation,
    ];

    pub const fn subheader(self) -> &'static str {
        match self {
            SectionId::Monthly => "Monthly PM2.5 Concentration",
            SectionId::DailyTrend => "Daily Trend of PM2.5 Concentration",
            SectionId::Hourly => "Hourly PM2.5 Concentration",
            SectionId::WindDirection => "PM2.5 Concentration by Wind Direction",
            SectionId::Correlation => "Correlation Between Variables",
        }
    }

    pub const fn caption(self) -> &'static str {
        match self {
            SectionId::Monthly => "Monthly average of PM2.5 concentration:",
            SectionId::DailyTrend => "Daily trend of PM2.5 concentration:",
            SectionId::Hourly => "Average PM2.5 concentration by the hour of the day:",
            SectionId::WindDirection => "PM2.5 concentration by wind direction:",
            SectionId::Correlation => "Correlation matrix heatmap:",
        }
    }

    pub const fn chart_title(self) -> &'static str {
        match self {
            SectionId::Monthly => "Monthly average PM2.5 concentration",
            SectionId::DailyTrend => "Daily trend of PM2.5 concentration",
            SectionId::Hourly => "Hourly PM2.5 concentration",
            SectionId::WindDirection => "PM2.5 concentration by wind direction",
            SectionId::Correlation => "Correlation matrix of variables",
        }
    }

    pub const fn x_label(self) -> Option<&'static str> {
        match self {
            SectionId::Monthly => Some("Month"),
            SectionId::DailyTrend => Some("Date"),
            SectionId::Hourly => Some(CONCENTRATION_AXIS),
            SectionId::WindDirection => Some("Wind direction"),
            SectionId::Correlation => None,
        }
    }

    pub const fn y_label(self) -> Option<&'static str> {
        match self {
            SectionId::Monthly | SectionId::DailyTrend | SectionId::WindDirection => {
                Some(CONCENTRATION_AXIS)
            }
            SectionId::Hourly => Some("Hours"),
            SectionId::Correlation => None,
        }
    }

    /// Image file name without extension
    pub const fn file_stem(self) -> &'static str {
        match self {
            SectionId::Monthly => "monthly",
            SectionId::DailyTrend => "daily_trend",
            SectionId::Hourly => "hourly",
            SectionId::WindDirection => "wind_direction",
            SectionId::Correlation => "correlation",
        }
    }

    /// HTML anchor of the section
    pub const fn anchor(self) -> &'static str {
        match self {
            SectionId::Monthly => "monthly",
            SectionId::DailyTrend => "daily",
            SectionId::Hourly => "hourly",
            SectionId::WindDirection => "wind",
            SectionId::Correlation => "correlation",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}
