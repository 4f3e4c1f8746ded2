//! Model schema versions.
//!
//! A trained model accepts exactly one row layout. The layout is carried by the
//! model file as a tag, and every record is assembled for that tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic kind of a model column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Numeric value (integers and macroeconomic floats alike)
    Numeric,
    /// Categorical string drawn from the reference dataset
    Categorical,
}

/// Column names as they appear in the reference dataset and the model.
pub mod columns {
    pub const AGE: &str = "age";
    pub const JOB: &str = "job";
    pub const MARITAL: &str = "marital";
    pub const EDUCATION: &str = "education";
    pub const DEFAULT: &str = "default";
    pub const HOUSING: &str = "housing";
    pub const LOAN: &str = "loan";
    pub const CONTACT: &str = "contact";
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const DURATION: &str = "duration";
    pub const CAMPAIGN: &str = "campaign";
    pub const PDAYS: &str = "pdays";
    pub const PREVIOUS: &str = "previous";
    pub const POUTCOME: &str = "poutcome";
    pub const EMP_VAR_RATE: &str = "emp.var.rate";
    pub const CONS_PRICE_IDX: &str = "cons.price.idx";
    pub const CONS_CONF_IDX: &str = "cons.conf.idx";
    pub const EURIBOR3M: &str = "euribor3m";
    pub const NR_EMPLOYED: &str = "nr.employed";
    pub const PDAYS_GROUPED: &str = "pdays_grouped";
}

use columns::*;

const GROUPED_COLUMNS: [(&str, ColumnKind); 19] = [
    (AGE, ColumnKind::Numeric),
    (JOB, ColumnKind::Categorical),
    (MARITAL, ColumnKind::Categorical),
    (EDUCATION, ColumnKind::Categorical),
    (DEFAULT, ColumnKind::Categorical),
    (HOUSING, ColumnKind::Categorical),
    (LOAN, ColumnKind::Categorical),
    (CONTACT, ColumnKind::Categorical),
    (MONTH, ColumnKind::Categorical),
    (DAY_OF_WEEK, ColumnKind::Categorical),
    (CAMPAIGN, ColumnKind::Numeric),
    (PREVIOUS, ColumnKind::Numeric),
    (POUTCOME, ColumnKind::Categorical),
    (EMP_VAR_RATE, ColumnKind::Numeric),
    (CONS_PRICE_IDX, ColumnKind::Numeric),
    (CONS_CONF_IDX, ColumnKind::Numeric),
    (EURIBOR3M, ColumnKind::Numeric),
    (NR_EMPLOYED, ColumnKind::Numeric),
    (PDAYS_GROUPED, ColumnKind::Categorical),
];

const RAW_COLUMNS: [(&str, ColumnKind); 20] = [
    (AGE, ColumnKind::Numeric),
    (JOB, ColumnKind::Categorical),
    (MARITAL, ColumnKind::Categorical),
    (EDUCATION, ColumnKind::Categorical),
    (DEFAULT, ColumnKind::Categorical),
    (HOUSING, ColumnKind::Categorical),
    (LOAN, ColumnKind::Categorical),
    (CONTACT, ColumnKind::Categorical),
    (MONTH, ColumnKind::Categorical),
    (DAY_OF_WEEK, ColumnKind::Categorical),
    (DURATION, ColumnKind::Numeric),
    (CAMPAIGN, ColumnKind::Numeric),
    (PDAYS, ColumnKind::Numeric),
    (PREVIOUS, ColumnKind::Numeric),
    (POUTCOME, ColumnKind::Categorical),
    (EMP_VAR_RATE, ColumnKind::Numeric),
    (CONS_PRICE_IDX, ColumnKind::Numeric),
    (CONS_CONF_IDX, ColumnKind::Numeric),
    (EURIBOR3M, ColumnKind::Numeric),
    (NR_EMPLOYED, ColumnKind::Numeric),
];

/// Row layout a model was fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Capped numerics, `admin` remap and `pdays` bucketed into `pdays_grouped`.
    #[serde(rename = "grouped_v2")]
    Grouped,
    /// Untransformed selections, including raw `duration` and `pdays`.
    #[serde(rename = "raw_v1")]
    Raw,
}

impl SchemaVersion {
    /// Stable tag used in model files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grouped => "grouped_v2",
            Self::Raw => "raw_v1",
        }
    }

    /// Ordered columns with their kinds.
    #[must_use]
    pub fn columns(&self) -> &'static [(&'static str, ColumnKind)] {
        match self {
            Self::Grouped => &GROUPED_COLUMNS,
            Self::Raw => &RAW_COLUMNS,
        }
    }

    /// Ordered column names.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns().iter().map(|(name, _)| *name)
    }

    /// Kind of `column`, or `None` if the schema does not carry it.
    #[must_use]
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.columns()
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| *kind)
    }

    /// Whether records for this schema go through capping, remapping and bucketing.
    #[must_use]
    pub fn normalizes(&self) -> bool {
        matches!(self, Self::Grouped)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grouped_v2" => Ok(Self::Grouped),
            "raw_v1" => Ok(Self::Raw),
            other => Err(format!(
                "Unknown schema version '{other}' (expected grouped_v2 or raw_v1)"
            )),
        }
    }
}
