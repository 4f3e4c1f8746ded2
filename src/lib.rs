//! # DepositScope
//!
//! Term-deposit subscription prediction from a terminal form.
//!
//! This crate provides:
//! - Reference statistics from the bank-marketing dataset (dropdown choices, caps)
//! - A feature normalizer producing schema-versioned records
//! - An opaque classifier port with a signed logistic model adapter
//! - Terminal UI for collecting attributes and rendering the verdict
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (CustomerInput, CustomerRecord, Prediction)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (dataset loader, logistic model)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{CustomerInput, CustomerRecord, Prediction, PredictionOutcome, SchemaVersion};

/// Result type for DepositScope operations
pub type Result<T> = std::result::Result<T, DepositError>;

/// Main error type for DepositScope
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    #[error("Reference dataset error: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Model error: {0}")]
    Model(#[from] adapters::ModelError),
}
