//! Classifier port: Trait for the opaque, pre-trained model.
//!
//! The application never looks inside the model. Its only contract is the
//! schema the model was fitted on and the shape of the output.

use crate::domain::{ColumnKind, CustomerRecord, SchemaVersion};

/// Errors raised by a classifier while scoring a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("unexpected column '{0}'")]
    UnexpectedColumn(String),

    #[error("column '{column}' has wrong type (expected {expected:?})")]
    WrongType { column: String, expected: ColumnKind },

    #[error("record built for schema {record} but model expects {model}")]
    SchemaMismatch {
        record: SchemaVersion,
        model: SchemaVersion,
    },

    #[error("numerical error: {0}")]
    Numerical(String),
}

/// Trait for a pre-trained binary classifier.
///
/// Implementations provide:
/// - The schema the model accepts
/// - Class-label prediction
/// - Optionally, the positive-class probability
pub trait Classifier: Send + Sync {
    /// Row layout the model was fitted on.
    fn schema(&self) -> SchemaVersion;

    /// Predict the class label for one record.
    ///
    /// # Errors
    /// Returns `ClassifierError` when the record does not match the fitted
    /// schema or scoring fails numerically.
    fn predict(&self, record: &CustomerRecord) -> Result<u8, ClassifierError>;

    /// Predict the positive-class probability, if the model exposes one.
    ///
    /// # Errors
    /// Same conditions as [`Classifier::predict`].
    fn predict_proba(&self, _record: &CustomerRecord) -> Result<Option<f64>, ClassifierError> {
        Ok(None)
    }
}
