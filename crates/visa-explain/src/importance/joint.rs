use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::importance::check_test_set;
use crate::intervals::{define_widened_intervals, Intervals};
use crate::math::{Array1, Array2};
use crate::metrics::{baseline_metrics, evaluate, Metric, PerMetric};
use crate::models::classifier_trait::{predict_checked, Classifier};

/// Lower bound of every joint difference, so the matrices stay strictly
/// positive for log and color scales.
pub const DIFF_FLOOR: f64 = 1e-10;

/// Absolute metric changes over a grid of interval pairs.
///
/// Each matrix is indexed `[interval of feature 2][interval of feature 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointImportance {
    pub intervals_1: Intervals,
    pub intervals_2: Intervals,
    pub diffs: PerMetric<Array2<f64>>,
}

impl JointImportance {
    /// `(num_intervals2, num_intervals1)`
    pub fn shape(&self) -> (usize, usize) {
        (self.intervals_2.len(), self.intervals_1.len())
    }
}

/// Joint interval importance of two features.
///
/// Both features are binned on their epsilon-widened range. For every cell
/// `(i, j)` the whole `feature_1` column is set to the midpoint of its
/// interval `j` and the whole `feature_2` column to the midpoint of its
/// interval `i`, then the model is re-scored. Cost is
/// `num_intervals1 * num_intervals2` predictions over the full test set.
pub fn joint_interval_importance<M>(
    model: &M,
    x: &Array2<f64>,
    y: &Array1<usize>,
    feature_1: usize,
    feature_2: usize,
    num_intervals1: usize,
    num_intervals2: usize,
) -> Result<JointImportance>
where
    M: Classifier + ?Sized,
{
    check_test_set(x, y)?;
    if feature_1 == feature_2 {
        return Err(ExplainError::DuplicateFeature { index: feature_1 });
    }

    let intervals_1 = define_widened_intervals(x, feature_1, num_intervals1)?;
    let intervals_2 = define_widened_intervals(x, feature_2, num_intervals2)?;
    let baseline = baseline_metrics(model, x, y)?;

    log::info!(
        "Computing joint importance of features {} and {} on a {}x{} grid ({} predictions)",
        feature_1,
        feature_2,
        num_intervals2,
        num_intervals1,
        num_intervals1 * num_intervals2
    );

    let shape = (num_intervals2, num_intervals1);
    let mut diffs: PerMetric<Array2<f64>> = PerMetric::from_fn(|_| Array2::from_elem(shape, 0.0));

    for i in 0..num_intervals2 {
        for j in 0..num_intervals1 {
            let mut modified = x.clone();
            modified.fill_column(feature_1, intervals_1.midpoint(j));
            modified.fill_column(feature_2, intervals_2.midpoint(i));

            let y_pred = predict_checked(model, &modified)?;
            let transformed = evaluate(y, &y_pred)?;

            for metric in Metric::ALL {
                let delta = (transformed.get(metric) - baseline.get(metric)).abs();
                diffs.get_mut(metric)[(i, j)] = delta.max(DIFF_FLOOR);
            }
        }
    }

    // floor every cell, NaN included
    for metric in Metric::ALL {
        for value in diffs.get_mut(metric).iter_mut() {
            if value.is_nan() || *value < DIFF_FLOOR {
                *value = DIFF_FLOOR;
            }
        }
    }

    Ok(JointImportance {
        intervals_1,
        intervals_2,
        diffs,
    })
}
