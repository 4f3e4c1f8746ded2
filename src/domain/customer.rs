//! Customer attributes for term-deposit subscription prediction.
//!
//! Attribute set follows the UCI bank-marketing dataset (`bank-additional-full.csv`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::SchemaVersion;

/// Raw selections from the form, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CustomerInput {
    /// Age in years
    pub age: f64,
    /// Job title (e.g. `admin.`, `technician`)
    pub job: String,
    pub marital: String,
    pub education: String,
    /// Has credit in default (`no`, `yes`, `unknown`)
    pub default: String,
    /// Has housing loan
    pub housing: String,
    /// Has personal loan
    pub loan: String,
    /// Contact communication type (`cellular`, `telephone`)
    pub contact: String,
    /// Last contact month (`jan`..`dec`)
    pub month: String,
    /// Last contact weekday (`mon`..`fri`)
    pub day_of_week: String,
    /// Last contact duration in seconds (raw schema only)
    pub duration: f64,
    /// Contacts performed during this campaign
    pub campaign: f64,
    /// Days since last contact in a previous campaign (999 = never contacted)
    pub pdays: f64,
    /// Contacts performed before this campaign
    pub previous: f64,
    /// Outcome of the previous campaign
    pub poutcome: String,
    /// Employment variation rate (quarterly)
    pub emp_var_rate: f64,
    /// Consumer price index (monthly)
    pub cons_price_idx: f64,
    /// Consumer confidence index (monthly)
    pub cons_conf_idx: f64,
    /// Euribor 3 month rate (daily)
    pub euribor3m: f64,
    /// Number of employees (quarterly)
    pub nr_employed: f64,
}

/// One cell of a customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Category(s) => Some(s),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Category(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Category(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        Self::Category(s)
    }
}

/// Render a number without a trailing `.0` when it is integral.
#[must_use]
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Single-row record handed to the classifier.
///
/// Immutable once built; construct it through [`super::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    schema: SchemaVersion,
    fields: Vec<(&'static str, FeatureValue)>,
}

impl CustomerRecord {
    pub(crate) fn from_fields(
        schema: SchemaVersion,
        fields: Vec<(&'static str, FeatureValue)>,
    ) -> Self {
        Self { schema, fields }
    }

    /// Schema this record was assembled for.
    #[must_use]
    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Column names in record order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Look up a cell by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> + '_ {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
