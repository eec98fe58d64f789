//! Explanation session over one trained model and one test set.
//!
//! The session evaluates the model on the unperturbed test set once, keeps
//! that baseline and hands it explicitly to every importance computation.
//! Nothing else is cached: each importance call rebuilds its perturbed
//! copies from scratch.
use crate::config::ImportanceConfig;
use crate::error::{ExplainError, Result};
use crate::importance::{
    check_test_set, interval_importance, joint_interval_importance, IntervalImportance,
    JointImportance,
};
use crate::math::{Array1, Array2};
use crate::metrics::{ConfusionMatrix, MetricBundle};
use crate::models::classifier_trait::{predict_checked, Classifier};
use crate::ranking::{FeatureRanking, RankedFeature};

pub struct Explainer<'a, M>
where
    M: Classifier + ?Sized,
{
    model: &'a M,
    x: &'a Array2<f64>,
    y: &'a Array1<usize>,
    config: ImportanceConfig,
    confusion: ConfusionMatrix,
    baseline: MetricBundle,
}

impl<'a, M> Explainer<'a, M>
where
    M: Classifier + ?Sized,
{
    /// Validate inputs and run the full-dataset evaluation.
    pub fn new(
        model: &'a M,
        x: &'a Array2<f64>,
        y: &'a Array1<usize>,
        config: ImportanceConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_test_set(x, y)?;

        let y_pred = predict_checked(model, x)?;
        let confusion = ConfusionMatrix::from_labels(y, &y_pred)?;
        let baseline = confusion.metrics();

        log::info!(
            "{} on {} test rows: accuracy={:.2}, precision={:.2}, recall={:.2}, f1={:.2}",
            model.name(),
            x.nrows(),
            baseline.accuracy,
            baseline.precision,
            baseline.recall,
            baseline.f1
        );

        Ok(Explainer {
            model,
            x,
            y,
            config,
            confusion,
            baseline,
        })
    }

    pub fn baseline(&self) -> &MetricBundle {
        &self.baseline
    }

    pub fn config(&self) -> &ImportanceConfig {
        &self.config
    }

    /// Confusion matrix of the baseline predictions, as counts or with each
    /// true-class row normalized to sum to 1. Rows and columns follow
    /// [`Explainer::classes`].
    pub fn confusion_matrix(&self, normalize: bool) -> Array2<f64> {
        if normalize {
            self.confusion.normalized_by_true()
        } else {
            self.confusion.counts().mapv(|&c| c as f64)
        }
    }

    /// Sorted labels seen in the test labels or the baseline predictions.
    pub fn classes(&self) -> &[usize] {
        self.confusion.classes()
    }

    pub fn feature_ranking(&self) -> Result<FeatureRanking> {
        let description = self.model.describe();
        if description.feature_names.len() != self.x.ncols() {
            return Err(ExplainError::LengthMismatch {
                expected: self.x.ncols(),
                found: description.feature_names.len(),
            });
        }
        FeatureRanking::from_description(&description)
    }

    /// The configured number of top features, or a third of them.
    pub fn top_features(&self) -> Result<Vec<RankedFeature>> {
        let ranking = self.feature_ranking()?;
        let k = self.config.top_features.unwrap_or_else(|| ranking.default_top());
        Ok(ranking.top(k).to_vec())
    }

    pub fn interval_importance(&self, feature: usize) -> Result<IntervalImportance> {
        interval_importance(
            self.model,
            self.x,
            self.y,
            feature,
            self.config.num_intervals,
            &self.baseline,
            self.config.fallback,
        )
    }

    pub fn joint_importance(&self, feature_1: usize, feature_2: usize) -> Result<JointImportance> {
        let (n1, n2) = self.config.joint_intervals;
        joint_interval_importance(self.model, self.x, self.y, feature_1, feature_2, n1, n2)
    }

    /// Joint importance of the two highest ranked features.
    pub fn default_joint_importance(&self) -> Result<JointImportance> {
        let (feature_1, feature_2) = self.feature_ranking()?.default_pair().ok_or_else(|| {
            ExplainError::Config("joint importance needs at least two features".to_string())
        })?;
        self.joint_importance(feature_1, feature_2)
    }
}
