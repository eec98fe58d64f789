//! Test classifiers with fully predictable behaviour.
#![allow(dead_code)]

use visa_explain::math::{Array1, Array2};
use visa_explain::models::{Classifier, ModelDescription};
use visa_explain::{ExplainError, Result};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Predicts class 1 when `x[feature] > threshold`, else class 0.
pub struct ThresholdModel {
    pub feature: usize,
    pub threshold: f64,
    pub n_features: usize,
}

impl Classifier for ThresholdModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok((0..x.nrows())
            .map(|row| usize::from(x[(row, self.feature)] > self.threshold))
            .collect())
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: (0..self.n_features).map(|i| format!("f{}", i)).collect(),
            importances: (0..self.n_features)
                .map(|i| if i == self.feature { 1.0 } else { 0.0 })
                .collect(),
        }
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

/// Predicts class 1 only when both features exceed their thresholds.
pub struct BothAboveModel {
    pub features: (usize, usize),
    pub thresholds: (f64, f64),
    pub n_features: usize,
}

impl Classifier for BothAboveModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let (a, b) = self.features;
        let (ta, tb) = self.thresholds;
        Ok((0..x.nrows())
            .map(|row| usize::from(x[(row, a)] > ta && x[(row, b)] > tb))
            .collect())
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: (0..self.n_features).map(|i| format!("f{}", i)).collect(),
            importances: (0..self.n_features)
                .map(|i| if i == self.features.0 || i == self.features.1 { 0.5 } else { 0.0 })
                .collect(),
        }
    }
}

/// Ignores its input and always predicts the same class.
pub struct ConstantModel {
    pub class: usize,
    pub n_features: usize,
}

impl Classifier for ConstantModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(Array1::from_elem(x.nrows(), self.class))
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: (0..self.n_features).map(|i| format!("f{}", i)).collect(),
            importances: vec![0.0; self.n_features],
        }
    }
}

/// Returns one prediction too few.
pub struct ShortModel;

impl Classifier for ShortModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        Ok(Array1::zeros(x.nrows().saturating_sub(1)))
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: vec![],
            importances: vec![],
        }
    }
}

/// Always fails, like an unfitted model would.
pub struct FailingModel;

impl Classifier for FailingModel {
    fn predict(&self, _x: &Array2<f64>) -> Result<Array1<usize>> {
        Err(ExplainError::Prediction("model is not fitted".to_string()))
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: vec![],
            importances: vec![],
        }
    }
}
