//! Dataset schemas and loaded datasets.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::value::Record;

/// Field names used by the built-in datasets.
pub mod fields {
    pub const COUNTRY: &str = "country";
    pub const VARIABLE: &str = "variable";
    pub const PERCENTILE: &str = "percentile";
    pub const YEAR: &str = "year";
    pub const VALUE: &str = "value";

    pub const HOUSEHOLD_TYPE: &str = "Household Type";
    pub const AGE_GROUP: &str = "Age Group";
    pub const CENSUS_YEAR: &str = "Year";
    pub const MEDIAN_INCOME: &str = "Median Income(dollars)";

    pub const STATE: &str = "State";
    pub const UNEMPLOYMENT_2024: &str = "October 2024 Unemployment Rate";
    pub const UNEMPLOYMENT_2023: &str = "October 2023 Unemployment Rate";
    pub const TOTAL_EMPLOYMENT: &str = "Total employment";
    pub const NET_CHANGE: &str = "12-month net change in employment";
    pub const PERCENT_CHANGE: &str = "12-month percent change in employment";

    pub const GSP: &str = "GSP";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
            required: true,
        }
    }

    pub fn categorical(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical,
            required: true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Numeric
    }
}

/// The dashboard's dataset families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    StateIndicators,
    HouseholdIncome,
    AgeIncome,
    Unemployment,
    Employment,
    Gsp,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 6] = [
        Self::StateIndicators,
        Self::HouseholdIncome,
        Self::AgeIncome,
        Self::Unemployment,
        Self::Employment,
        Self::Gsp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateIndicators => "state_indicators",
            Self::HouseholdIncome => "household_income",
            Self::AgeIncome => "age_income",
            Self::Unemployment => "unemployment",
            Self::Employment => "employment",
            Self::Gsp => "gsp",
        }
    }

    pub fn schema(self) -> DatasetSchema {
        use fields::{
            AGE_GROUP, CENSUS_YEAR, COUNTRY, GSP, HOUSEHOLD_TYPE, MEDIAN_INCOME, NET_CHANGE,
            PERCENT_CHANGE, PERCENTILE, STATE, TOTAL_EMPLOYMENT, UNEMPLOYMENT_2023,
            UNEMPLOYMENT_2024, VALUE, VARIABLE, YEAR,
        };
        let fields = match self {
            Self::StateIndicators => vec![
                FieldSpec::categorical(COUNTRY),
                FieldSpec::categorical(VARIABLE),
                FieldSpec::categorical(PERCENTILE),
                FieldSpec::numeric(YEAR),
                FieldSpec::numeric(VALUE),
            ],
            Self::HouseholdIncome => vec![
                FieldSpec::categorical(HOUSEHOLD_TYPE),
                FieldSpec::numeric(CENSUS_YEAR),
                FieldSpec::numeric(MEDIAN_INCOME),
            ],
            Self::AgeIncome => vec![
                FieldSpec::categorical(AGE_GROUP),
                FieldSpec::numeric(CENSUS_YEAR),
                FieldSpec::numeric(MEDIAN_INCOME),
            ],
            Self::Unemployment => vec![
                FieldSpec::categorical(STATE),
                FieldSpec::numeric(UNEMPLOYMENT_2024),
                FieldSpec::numeric(UNEMPLOYMENT_2023),
            ],
            Self::Employment => vec![
                FieldSpec::categorical(STATE),
                FieldSpec::numeric(TOTAL_EMPLOYMENT),
                FieldSpec::numeric(NET_CHANGE),
                FieldSpec::numeric(PERCENT_CHANGE),
            ],
            Self::Gsp => vec![
                FieldSpec::categorical(STATE),
                FieldSpec::numeric(CENSUS_YEAR),
                FieldSpec::numeric(GSP),
            ],
        };
        DatasetSchema { kind: self, fields }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub kind: DatasetKind,
    pub fields: Vec<FieldSpec>,
}

impl DatasetSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// A value that could not be coerced while loading; the record was kept
/// with a `NaN` sentinel in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadIssue {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub field: String,
    pub raw: String,
}

/// An ordered, immutable sequence of records in file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: DatasetSchema,
    pub source: Option<PathBuf>,
    pub records: Vec<Record>,
    pub issues: Vec<LoadIssue>,
}

impl Dataset {
    pub fn new(schema: DatasetSchema, records: Vec<Record>) -> Self {
        Self {
            schema,
            source: None,
            records,
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn kind(&self) -> DatasetKind {
        self.schema.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
