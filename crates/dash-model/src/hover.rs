//! Typed hover payloads.
//!
//! Each panel resolves the item under the pointer into its own variant, so
//! tooltip text never has to guess which dataset a record came from.

use serde::{Deserialize, Serialize};

use crate::value::{format_numeric, format_thousands};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    IndicatorLines,
    HouseholdBars,
    AgeBars,
    UnemploymentMap,
    EmploymentMap,
    GspLines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum HoverPayload {
    Series {
        key: String,
    },
    HouseholdBar {
        household_type: String,
        income: f64,
    },
    AgeBar {
        age_group: String,
        income: f64,
    },
    Unemployment {
        state: String,
        rate_2024: f64,
        rate_2023: f64,
    },
    Employment {
        state: String,
        total: f64,
        net_change: f64,
        percent_change: f64,
    },
}

impl HoverPayload {
    pub fn title(&self) -> &str {
        match self {
            Self::Series { key } => key,
            Self::HouseholdBar { household_type, .. } => household_type,
            Self::AgeBar { age_group, .. } => age_group,
            Self::Unemployment { state, .. } | Self::Employment { state, .. } => state,
        }
    }

    /// Plain-text tooltip lines; the first line is always the title.
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title().to_string()];
        match self {
            Self::Series { .. } => {}
            Self::HouseholdBar { income, .. } | Self::AgeBar { income, .. } => {
                lines.push(format!("Median Income: ${}", format_numeric(*income)));
            }
            Self::Unemployment {
                rate_2024,
                rate_2023,
                ..
            } => {
                lines.push(format!("2024 Unemployment Rate: {rate_2024:.1}%"));
                lines.push(format!("2023 Unemployment Rate: {rate_2023:.1}%"));
            }
            Self::Employment {
                total,
                net_change,
                percent_change,
                ..
            } => {
                lines.push(format!("2024 Total Employment: {}", format_thousands(*total)));
                lines.push(format!(
                    "Net Change Over Last 12 Months: {}",
                    format_thousands(*net_change)
                ));
                lines.push(format!(
                    "Percent Change Over Last 12 Months: {percent_change:.1}%"
                ));
            }
        }
        lines
    }
}
