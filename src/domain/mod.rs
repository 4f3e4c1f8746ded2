//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: schema versions, customer records, the feature
//! normalizer, reference statistics and prediction verdicts.

mod customer;
pub mod normalize;
mod prediction;
pub mod reference;
pub mod schema;

pub use customer::{format_number, CustomerInput, CustomerRecord, FeatureValue};
pub use normalize::{normalize, Thresholds};
pub use prediction::{Prediction, PredictionOutcome, Verdict, POSITIVE_LABEL};
pub use reference::{ReferenceData, ReferenceError};
pub use schema::{ColumnKind, SchemaVersion};
