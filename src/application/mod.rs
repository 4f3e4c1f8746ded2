//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod bootstrap;
mod prediction;

pub use bootstrap::bootstrap;
pub use prediction::PredictionService;
