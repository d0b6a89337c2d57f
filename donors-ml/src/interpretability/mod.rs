//! Interpretability: which features a trained model leans on.

pub mod importance;

pub use importance::{
    FeatureImportance, cumulative_weight, rank_features, reduce_to_top_features, top_k_indices,
};
