//! Final model evaluation.

pub mod comparison;

pub use comparison::{ModelComparison, ModelScore};
