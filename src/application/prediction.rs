//! Prediction service: Turns form selections into a rendered outcome.
//!
//! This service coordinates:
//! - Default selections from the reference dataset
//! - Record assembly for the model's schema
//! - Classifier invocation and error capture

use std::sync::Arc;

use crate::domain::{
    normalize, CustomerInput, CustomerRecord, Prediction, PredictionOutcome, ReferenceData,
    SchemaVersion,
};
use crate::ports::Classifier;

/// Service for scoring one customer at a time.
///
/// Holds no per-request state. Each `predict` call stands alone.
pub struct PredictionService<C: Classifier> {
    classifier: Arc<C>,
    reference: Arc<ReferenceData>,
}

impl<C: Classifier> PredictionService<C> {
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>, reference: Arc<ReferenceData>) -> Self {
        Self {
            classifier,
            reference,
        }
    }

    /// Schema of the loaded model.
    #[must_use]
    pub fn schema(&self) -> SchemaVersion {
        self.classifier.schema()
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Initial form state: the first choice of every dropdown and the default age.
    #[must_use]
    pub fn default_input(&self) -> CustomerInput {
        let reference = &self.reference;
        let category = |column: &str| {
            reference
                .choices(column)
                .first()
                .cloned()
                .unwrap_or_default()
        };
        let number = |column: &str| {
            reference
                .numeric_choices(column)
                .first()
                .copied()
                .unwrap_or_default()
        };

        CustomerInput {
            age: reference.default_age(),
            job: category("job"),
            marital: category("marital"),
            education: category("education"),
            default: category("default"),
            housing: category("housing"),
            loan: category("loan"),
            contact: category("contact"),
            month: category("month"),
            day_of_week: category("day_of_week"),
            duration: 0.0,
            campaign: number("campaign"),
            pdays: number("pdays"),
            previous: number("previous"),
            poutcome: category("poutcome"),
            emp_var_rate: number("emp.var.rate"),
            cons_price_idx: number("cons.price.idx"),
            cons_conf_idx: number("cons.conf.idx"),
            euribor3m: number("euribor3m"),
            nr_employed: number("nr.employed"),
        }
    }

    /// Assemble the record the model expects from raw selections.
    #[must_use]
    pub fn build_record(&self, input: &CustomerInput) -> CustomerRecord {
        normalize(input, &self.reference.thresholds(), self.schema())
    }

    /// Score one record.
    ///
    /// Never fails: classifier errors become `PredictionOutcome::Failure`.
    pub fn predict(&self, record: &CustomerRecord) -> PredictionOutcome {
        let scored = self.classifier.predict(record).and_then(|label| {
            let probability = self.classifier.predict_proba(record)?;
            Ok(Prediction::new(label, probability))
        });

        match scored {
            Ok(prediction) => {
                tracing::info!(
                    "Prediction complete: label={}, probability={:?}",
                    prediction.label,
                    prediction.probability
                );
                PredictionOutcome::success(prediction)
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                PredictionOutcome::failure(e)
            }
        }
    }

    /// Build and score in one step.
    pub fn predict_input(&self, input: &CustomerInput) -> PredictionOutcome {
        let record = self.build_record(input);
        self.predict(&record)
    }
}
