//! visa-explain: interval-perturbation feature importance for classifiers.
//!
//! Given a trained classifier and a held-out test set, this crate measures
//! how much accuracy and weighted precision / recall / F1 change when a
//! feature's values are moved to points inside equal-width intervals of its
//! observed range, for single features and for pairs of features.
//!
//! The model is an opaque [`models::Classifier`]; a one-vs-rest GBDT
//! adapter is bundled. Rendering the resulting series and matrices is left
//! to the caller.
pub mod config;
pub mod error;
pub mod explainer;
pub mod feature_selection;
pub mod importance;
pub mod intervals;
pub mod math;
pub mod metrics;
pub mod models;
pub mod ranking;

pub use error::{ExplainError, Result};
pub use explainer::Explainer;
