use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::config::{ModelConfig, ModelType};
use crate::error::{ExplainError, Result};
use crate::feature_selection::univariate_selection::{f_classif, normalize_scores};
use crate::math::{Array1, Array2};
use crate::models::classifier_trait::{Classifier, ModelDescription};

/// Multi-class Gradient Boosting Decision Tree (GBDT) classifier.
///
/// One binary booster is trained per observed class (one-vs-rest) and the
/// class with the highest score wins. Importances reported by `describe`
/// are the normalized ANOVA F-scores of the training data.
pub struct GBDTClassifier {
    params: ModelConfig,
    feature_names: Vec<String>,
    classes: Vec<usize>,
    boosters: Vec<GBDT>,
    importances: Vec<f64>,
}

impl GBDTClassifier {
    pub fn new(params: ModelConfig) -> Self {
        GBDTClassifier {
            params,
            feature_names: Vec::new(),
            classes: Vec::new(),
            boosters: Vec::new(),
            importances: Vec::new(),
        }
    }

    /// Column names reported by `describe`. Defaults to `feature_<i>`.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ExplainError::LengthMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ExplainError::EmptyDataset);
        }
        if self.feature_names.is_empty() {
            self.feature_names = (0..x.ncols()).map(|i| format!("feature_{}", i)).collect();
        } else if self.feature_names.len() != x.ncols() {
            return Err(ExplainError::Config(format!(
                "{} feature names given for {} columns",
                self.feature_names.len(),
                x.ncols()
            )));
        }

        let mut classes: Vec<usize> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let (f_scores, _) = f_classif(x, y)?;
        self.importances = normalize_scores(&f_scores).to_vec();

        let mut boosters = Vec::with_capacity(classes.len());
        if classes.len() > 1 {
            for &class in &classes {
                let mut train_x = DataVec::new();
                for row in 0..x.nrows() {
                    let label = if y[row] == class { 1.0 } else { -1.0 };
                    train_x.push(Data::new_training_data(to_f32(x.row_slice(row)), 1.0, label, None));
                }

                let mut booster = GBDT::new(&self.booster_config(x.ncols()));
                booster.fit(&mut train_x);
                boosters.push(booster);
            }
        }

        log::info!(
            "Trained GBDT on {} samples, {} features, {} classes",
            x.nrows(),
            x.ncols(),
            classes.len()
        );

        self.classes = classes;
        self.boosters = boosters;
        Ok(())
    }

    fn booster_config(&self, feature_size: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(self.params.learning_rate);

        match &self.params.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                debug,
                training_optimization_level,
                loss_type,
            } => {
                config.set_max_depth(*max_depth);
                config.set_iterations(*num_boost_round as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);
            }
        }

        config
    }
}

fn to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}

impl Classifier for GBDTClassifier {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        if !self.is_fitted() {
            return Err(ExplainError::Prediction(
                "GBDT model has not been fitted".to_string(),
            ));
        }
        if x.ncols() != self.feature_names.len() {
            return Err(ExplainError::Prediction(format!(
                "model was fitted on {} features but got {}",
                self.feature_names.len(),
                x.ncols()
            )));
        }

        // a single training class needs no booster
        if self.boosters.is_empty() {
            return Ok(Array1::from_elem(x.nrows(), self.classes[0]));
        }

        let mut test_x = DataVec::new();
        for row in 0..x.nrows() {
            test_x.push(Data::new_training_data(to_f32(x.row_slice(row)), 1.0, 0.0, None));
        }

        let scores: Vec<Vec<f32>> = self.boosters.iter().map(|b| b.predict(&test_x)).collect();

        let predictions = (0..x.nrows())
            .map(|row| {
                let mut best = 0;
                for k in 1..scores.len() {
                    if scores[k][row] > scores[best][row] {
                        best = k;
                    }
                }
                self.classes[best]
            })
            .collect();

        Ok(predictions)
    }

    fn describe(&self) -> ModelDescription {
        ModelDescription {
            feature_names: self.feature_names.clone(),
            importances: self.importances.clone(),
        }
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
