//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external resources:
//! - `dataset`: semicolon-delimited reference dataset loader
//! - `model`: exported logistic model implementing `Classifier`

pub mod dataset;
pub mod model;

// Re-export adapter errors for lib.rs
pub use dataset::DatasetError;
pub use model::ModelError;
