use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::importance::{check_test_set, FallbackPolicy};
use crate::intervals::{define_intervals, Intervals};
use crate::math::{Array1, Array2};
use crate::metrics::{evaluate, Metric, MetricBundle, PerMetric};
use crate::models::classifier_trait::{predict_checked, Classifier};

/// Signed metric drops (`baseline - perturbed`), one entry per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalImportance {
    pub intervals: Intervals,
    pub diffs: PerMetric<Array1<f64>>,
}

impl IntervalImportance {
    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// False when every accuracy difference is exactly zero, i.e. there is
    /// nothing worth charting for this feature.
    pub fn has_signal(&self) -> bool {
        self.diffs.accuracy.iter().any(|&d| d != 0.0)
    }
}

/// Single-feature interval importance.
///
/// For every interval `[lo, hi]` of `feature`, two copies of `x` are built:
/// rows whose value lies in the interval are clamped to `lo` in the first
/// copy and to `hi` in the second, all other rows take the value chosen by
/// `fallback`. The copies are stacked (labels duplicated to match),
/// predicted once and scored, and the drop against `baseline` is recorded.
///
/// `baseline` must have been computed on the same unperturbed `x`/`y`; see
/// [`crate::metrics::baseline_metrics`].
pub fn interval_importance<M>(
    model: &M,
    x: &Array2<f64>,
    y: &Array1<usize>,
    feature: usize,
    num_intervals: usize,
    baseline: &MetricBundle,
    fallback: FallbackPolicy,
) -> Result<IntervalImportance>
where
    M: Classifier + ?Sized,
{
    check_test_set(x, y)?;
    let intervals = define_intervals(x, feature, num_intervals)?;

    log::info!(
        "Computing interval importance of feature {} over {} intervals with {}",
        feature,
        intervals.len(),
        model.name()
    );

    let y_doubled = y.concat(y);
    let mut diffs: PerMetric<Array1<f64>> = PerMetric::from_fn(|_| Array1::zeros(intervals.len()));

    for i in 0..intervals.len() {
        let (lo, hi) = intervals.bounds(i);
        let left = clamp_interval(x, &intervals, i, lo, fallback);
        let right = clamp_interval(x, &intervals, i, hi, fallback);
        let combined = left.vstack(&right)?;

        let y_pred = predict_checked(model, &combined)?;
        let transformed = evaluate(&y_doubled, &y_pred)?;

        for metric in Metric::ALL {
            diffs.get_mut(metric)[i] = baseline.get(metric) - transformed.get(metric);
        }

        log::debug!(
            "Interval {} [{}, {}]: accuracy diff {:.6}",
            i,
            lo,
            hi,
            diffs.accuracy[i]
        );
    }

    let result = IntervalImportance { intervals, diffs };
    if !result.has_signal() {
        log::warn!(
            "The differences in error metrics are too small to display meaningful charts. \
             Try a different feature or larger dataset."
        );
    }

    Ok(result)
}

/// Copy of `x` where in-interval rows of the feature are set to `edge`.
fn clamp_interval(
    x: &Array2<f64>,
    intervals: &Intervals,
    i: usize,
    edge: f64,
    fallback: FallbackPolicy,
) -> Array2<f64> {
    let feature = intervals.feature();
    let mut out = x.clone();
    out.map_column(feature, |row| {
        let value = row[feature];
        if intervals.contains(i, value) {
            edge
        } else {
            match fallback {
                FallbackPolicy::FirstColumn => row[0],
                FallbackPolicy::OriginalValue => value,
            }
        }
    });
    out
}
