//! Reference dataset statistics.
//!
//! The historical dataset is never shown to the model. It only supplies the
//! legal dropdown values and the capping thresholds.

use std::collections::BTreeMap;

use super::normalize::Thresholds;
use super::schema::columns;

/// Columns offered as categorical dropdowns.
pub const CATEGORICAL_COLUMNS: [&str; 10] = [
    columns::JOB,
    columns::MARITAL,
    columns::EDUCATION,
    columns::DEFAULT,
    columns::HOUSING,
    columns::LOAN,
    columns::CONTACT,
    columns::MONTH,
    columns::DAY_OF_WEEK,
    columns::POUTCOME,
];

/// Numeric columns read from the dataset.
pub const NUMERIC_COLUMNS: [&str; 10] = [
    columns::AGE,
    columns::DURATION,
    columns::CAMPAIGN,
    columns::PDAYS,
    columns::PREVIOUS,
    columns::EMP_VAR_RATE,
    columns::CONS_PRICE_IDX,
    columns::CONS_CONF_IDX,
    columns::EURIBOR3M,
    columns::NR_EMPLOYED,
];

pub const CAMPAIGN_QUANTILE: f64 = 0.95;
pub const PREVIOUS_QUANTILE: f64 = 0.95;
pub const AGE_QUANTILE: f64 = 0.99;

/// Starting position of the age slider.
pub const DEFAULT_AGE: f64 = 30.0;

/// Errors building reference statistics from a parsed table.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReferenceError {
    #[error("Reference dataset has no rows")]
    Empty,

    #[error("Reference dataset is missing column '{0}'")]
    MissingColumn(String),

    #[error("Reference column '{0}' has no usable values")]
    NoValues(String),
}

/// Cell spellings treated as missing.
fn is_null(cell: &str) -> bool {
    matches!(
        cell.trim(),
        "" | "NA" | "N/A" | "NaN" | "nan" | "null" | "NULL" | "None"
    )
}

/// Linear-interpolated quantile over ascending `sorted` values.
///
/// Position is `(n - 1) * q`, interpolating between the two closest ranks.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Read-only statistics over the reference dataset.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    categorical: BTreeMap<&'static str, Vec<String>>,
    numeric: BTreeMap<&'static str, Vec<f64>>,
    ranges: BTreeMap<&'static str, (f64, f64)>,
    thresholds: Thresholds,
    row_count: usize,
    dropped_cells: usize,
}

impl ReferenceData {
    /// Build statistics from a header and its rows.
    ///
    /// Null or unparseable cells are dropped without notice, which can shrink
    /// the set of selectable values.
    ///
    /// # Errors
    /// Returns an error if there are no rows, a required column is absent, or a
    /// required column has no usable values.
    pub fn from_rows<R, S>(header: &[S], rows: &[R]) -> Result<Self, ReferenceError>
    where
        R: AsRef<[String]>,
        S: AsRef<str>,
    {
        if rows.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let index_of = |name: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or_else(|| ReferenceError::MissingColumn(name.to_string()))
        };

        let mut dropped_cells = 0usize;

        let mut categorical = BTreeMap::new();
        for name in CATEGORICAL_COLUMNS {
            let idx = index_of(name)?;
            let mut values: Vec<String> = Vec::new();
            for row in rows {
                match row.as_ref().get(idx).map(|c| c.trim()) {
                    Some(cell) if !is_null(cell) => values.push(cell.to_string()),
                    _ => dropped_cells += 1,
                }
            }
            values.sort_unstable();
            values.dedup();
            if values.is_empty() {
                return Err(ReferenceError::NoValues(name.to_string()));
            }
            categorical.insert(name, values);
        }

        let mut numeric = BTreeMap::new();
        let mut ranges = BTreeMap::new();
        let mut sorted_full: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();
        for name in NUMERIC_COLUMNS {
            let idx = index_of(name)?;
            let mut values: Vec<f64> = Vec::with_capacity(rows.len());
            for row in rows {
                let parsed = row
                    .as_ref()
                    .get(idx)
                    .map(|c| c.trim())
                    .filter(|c| !is_null(c))
                    .and_then(|c| c.parse::<f64>().ok())
                    .filter(|v| v.is_finite());
                match parsed {
                    Some(v) => values.push(v),
                    None => dropped_cells += 1,
                }
            }
            if values.is_empty() {
                return Err(ReferenceError::NoValues(name.to_string()));
            }
            values.sort_by(|a, b| a.total_cmp(b));
            ranges.insert(name, (values[0], values[values.len() - 1]));

            let mut distinct = values.clone();
            distinct.dedup();
            numeric.insert(name, distinct);
            sorted_full.insert(name, values);
        }

        let q = |name: &'static str, p: f64| {
            sorted_full
                .get(name)
                .and_then(|v| quantile(v, p))
                .ok_or_else(|| ReferenceError::NoValues(name.to_string()))
        };
        let thresholds = Thresholds {
            campaign_cap: q(columns::CAMPAIGN, CAMPAIGN_QUANTILE)?,
            previous_cap: q(columns::PREVIOUS, PREVIOUS_QUANTILE)?,
            age_cap: q(columns::AGE, AGE_QUANTILE)?,
        };

        Ok(Self {
            categorical,
            numeric,
            ranges,
            thresholds,
            row_count: rows.len(),
            dropped_cells,
        })
    }

    /// Sorted distinct values of a categorical column (empty if unknown).
    #[must_use]
    pub fn choices(&self, column: &str) -> &[String] {
        self.categorical
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ascending distinct values of a numeric column (empty if unknown).
    #[must_use]
    pub fn numeric_choices(&self, column: &str) -> &[f64] {
        self.numeric.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(min, max)` of a numeric column.
    #[must_use]
    pub fn range(&self, column: &str) -> Option<(f64, f64)> {
        self.ranges.get(column).copied()
    }

    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Age slider start: 30, clamped into the observed range.
    #[must_use]
    pub fn default_age(&self) -> f64 {
        match self.range(columns::AGE) {
            Some((min, max)) => DEFAULT_AGE.clamp(min, max),
            None => DEFAULT_AGE,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Cells skipped as null or unparseable.
    #[must_use]
    pub fn dropped_cells(&self) -> usize {
        self.dropped_cells
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADER: [&str; 21] = [
        "age",
        "job",
        "marital",
        "education",
        "default",
        "housing",
        "loan",
        "contact",
        "month",
        "day_of_week",
        "duration",
        "campaign",
        "pdays",
        "previous",
        "poutcome",
        "emp.var.rate",
        "cons.price.idx",
        "cons.conf.idx",
        "euribor3m",
        "nr.employed",
        "y",
    ];

    pub(crate) fn row(age: u32, job: &str, campaign: u32, pdays: u32, previous: u32) -> Vec<String> {
        [
            age.to_string().as_str(),
            job,
            "married",
            "basic.4y",
            "no",
            "no",
            "no",
            "telephone",
            "may",
            "mon",
            "261",
            campaign.to_string().as_str(),
            pdays.to_string().as_str(),
            previous.to_string().as_str(),
            "nonexistent",
            "1.1",
            "93.994",
            "-36.4",
            "4.857",
            "5191",
            "no",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(5.0));
        assert_eq!(quantile(&v, 0.5), Some(3.0));
        // (5 - 1) * 0.95 = 3.8 -> 4 + 0.8 * (5 - 4)
        let q95 = quantile(&v, 0.95).expect("quantile");
        assert!((q95 - 4.8).abs() < 1e-12);

        assert_eq!(quantile(&[7.0], 0.99), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&v, 1.5), None);
    }

    #[test]
    fn test_from_rows_builds_choices_and_thresholds() {
        let rows: Vec<Vec<String>> = (0..100)
            .map(|i| {
                let job = if i % 2 == 0 { "admin." } else { "technician" };
                row(20 + i, job, 1 + i % 10, if i % 3 == 0 { 999 } else { 6 }, i % 2)
            })
            .collect();

        let data = ReferenceData::from_rows(&HEADER, &rows).expect("build reference");

        assert_eq!(data.row_count(), 100);
        assert_eq!(data.choices("job"), ["admin.", "technician"]);
        assert_eq!(data.choices("marital"), ["married"]);
        assert_eq!(data.numeric_choices("pdays"), [6.0, 999.0]);
        assert_eq!(data.range("age"), Some((20.0, 119.0)));
        assert_eq!(data.default_age(), 30.0);

        let t = data.thresholds();
        // ages 20..=119, (100 - 1) * 0.99 = 98.01
        assert!((t.age_cap - 118.01).abs() < 1e-9);
        assert_eq!(t.previous_cap, 1.0);
        assert_eq!(t.campaign_cap, 10.0);
    }

    #[test]
    fn test_null_cells_are_dropped_silently() {
        let mut rows = vec![row(30, "admin.", 1, 999, 0), row(40, "retired", 2, 3, 1)];
        rows[1][1] = "NA".to_string();
        rows[1][0] = String::new();

        let data = ReferenceData::from_rows(&HEADER, &rows).expect("build reference");
        assert_eq!(data.choices("job"), ["admin."]);
        assert_eq!(data.range("age"), Some((30.0, 30.0)));
        assert_eq!(data.dropped_cells(), 2);
    }

    #[test]
    fn test_default_age_is_clamped_into_range() {
        let rows = vec![row(45, "admin.", 1, 999, 0), row(60, "admin.", 1, 999, 0)];
        let data = ReferenceData::from_rows(&HEADER, &rows).expect("build reference");
        assert_eq!(data.default_age(), 45.0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "poutcome").collect();
        let rows = vec![row(30, "admin.", 1, 999, 0)];
        let err = ReferenceData::from_rows(&header, &rows).expect_err("must fail");
        assert_eq!(err, ReferenceError::MissingColumn("poutcome".into()));
    }

    #[test]
    fn test_empty_and_all_null_columns_are_errors() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(
            ReferenceData::from_rows(&HEADER, &rows).expect_err("empty"),
            ReferenceError::Empty
        );

        let mut rows = vec![row(30, "admin.", 1, 999, 0)];
        rows[0][2] = "null".into();
        assert_eq!(
            ReferenceData::from_rows(&HEADER, &rows).expect_err("no values"),
            ReferenceError::NoValues("marital".into())
        );
    }

    #[test]
    fn test_unknown_column_lookups_are_empty() {
        let rows = vec![row(30, "admin.", 1, 999, 0)];
        let data = ReferenceData::from_rows(&HEADER, &rows).expect("build reference");
        assert!(data.choices("y").is_empty());
        assert!(data.numeric_choices("job").is_empty());
        assert_eq!(data.range("job"), None);
    }
}
