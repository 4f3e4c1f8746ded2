//! Feature normalizer: the three fixed rules applied before assembly.
//!
//! - numeric capping of `campaign`, `previous` and `age` at reference quantiles
//! - `job == "admin."` remapped to `"admin"`
//! - `pdays` bucketed into `pdays_grouped`

use serde::{Deserialize, Serialize};

use super::customer::{CustomerInput, CustomerRecord, FeatureValue};
use super::schema::{columns, SchemaVersion};

/// `pdays` sentinel meaning the customer was never contacted before.
pub const PDAYS_NEVER_CONTACTED: f64 = 999.0;

pub const NEVER_CONTACTED: &str = "never_contacted";
pub const CONTACTED_BEFORE: &str = "contacted_before";

/// Upper thresholds derived from the reference dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// 95th percentile of `campaign`
    pub campaign_cap: f64,
    /// 95th percentile of `previous`
    pub previous_cap: f64,
    /// 99th percentile of `age`
    pub age_cap: f64,
}

/// Clamp `raw` so it does not exceed `threshold`.
#[must_use]
pub fn cap(raw: f64, threshold: f64) -> f64 {
    raw.min(threshold)
}

/// Fold the dataset's `admin.` spelling onto the model's `admin`.
#[must_use]
pub fn remap_job(job: &str) -> &str {
    if job == "admin." {
        "admin"
    } else {
        job
    }
}

#[must_use]
pub fn bucket_pdays(pdays: f64) -> &'static str {
    if pdays == PDAYS_NEVER_CONTACTED {
        NEVER_CONTACTED
    } else {
        CONTACTED_BEFORE
    }
}

/// Build the record for `schema` from raw selections.
///
/// Never fails: widgets constrain every input to its domain, and schema
/// conformance is checked by the classifier itself.
#[must_use]
pub fn normalize(
    input: &CustomerInput,
    thresholds: &Thresholds,
    schema: SchemaVersion,
) -> CustomerRecord {
    let fields = match schema {
        SchemaVersion::Grouped => vec![
            (columns::AGE, cap(input.age, thresholds.age_cap).into()),
            (columns::JOB, remap_job(&input.job).into()),
            (columns::MARITAL, input.marital.clone().into()),
            (columns::EDUCATION, input.education.clone().into()),
            (columns::DEFAULT, input.default.clone().into()),
            (columns::HOUSING, input.housing.clone().into()),
            (columns::LOAN, input.loan.clone().into()),
            (columns::CONTACT, input.contact.clone().into()),
            (columns::MONTH, input.month.clone().into()),
            (columns::DAY_OF_WEEK, input.day_of_week.clone().into()),
            (
                columns::CAMPAIGN,
                cap(input.campaign, thresholds.campaign_cap).into(),
            ),
            (
                columns::PREVIOUS,
                cap(input.previous, thresholds.previous_cap).into(),
            ),
            (columns::POUTCOME, input.poutcome.clone().into()),
            (columns::EMP_VAR_RATE, input.emp_var_rate.into()),
            (columns::CONS_PRICE_IDX, input.cons_price_idx.into()),
            (columns::CONS_CONF_IDX, input.cons_conf_idx.into()),
            (columns::EURIBOR3M, input.euribor3m.into()),
            (columns::NR_EMPLOYED, input.nr_employed.into()),
            (
                columns::PDAYS_GROUPED,
                FeatureValue::from(bucket_pdays(input.pdays)),
            ),
        ],
        SchemaVersion::Raw => vec![
            (columns::AGE, input.age.into()),
            (columns::JOB, input.job.clone().into()),
            (columns::MARITAL, input.marital.clone().into()),
            (columns::EDUCATION, input.education.clone().into()),
            (columns::DEFAULT, input.default.clone().into()),
            (columns::HOUSING, input.housing.clone().into()),
            (columns::LOAN, input.loan.clone().into()),
            (columns::CONTACT, input.contact.clone().into()),
            (columns::MONTH, input.month.clone().into()),
            (columns::DAY_OF_WEEK, input.day_of_week.clone().into()),
            (columns::DURATION, input.duration.into()),
            (columns::CAMPAIGN, input.campaign.into()),
            (columns::PDAYS, input.pdays.into()),
            (columns::PREVIOUS, input.previous.into()),
            (columns::POUTCOME, input.poutcome.clone().into()),
            (columns::EMP_VAR_RATE, input.emp_var_rate.into()),
            (columns::CONS_PRICE_IDX, input.cons_price_idx.into()),
            (columns::CONS_CONF_IDX, input.cons_conf_idx.into()),
            (columns::EURIBOR3M, input.euribor3m.into()),
            (columns::NR_EMPLOYED, input.nr_employed.into()),
        ],
    };

    CustomerRecord::from_fields(schema, fields)
}
