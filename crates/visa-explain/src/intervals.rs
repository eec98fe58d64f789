//! Equal-width binning of a feature's observed range.
use itertools_num::linspace;
use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::math::Array2;

/// Offset applied to both ends of the range before joint binning so that
/// boundary values are never excluded.
pub const EDGE_EPSILON: f64 = 1e-10;

/// `n + 1` strictly increasing edges splitting one feature into `n` bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIntervals")]
pub struct Intervals {
    feature: usize,
    edges: Vec<f64>,
}

/// Unchecked wire form of [`Intervals`].
#[derive(Deserialize)]
struct RawIntervals {
    feature: usize,
    edges: Vec<f64>,
}

impl TryFrom<RawIntervals> for Intervals {
    type Error = ExplainError;

    fn try_from(raw: RawIntervals) -> Result<Self> {
        let RawIntervals { feature, edges } = raw;
        if edges.len() < 2 {
            return Err(ExplainError::InvalidIntervalCount {
                count: edges.len().saturating_sub(1),
            });
        }
        if !edges_are_valid(&edges) {
            return Err(ExplainError::DegenerateIntervals {
                feature,
                min: edges[0],
                max: edges[edges.len() - 1],
            });
        }
        Ok(Intervals { feature, edges })
    }
}

impl Intervals {
    pub fn feature(&self) -> usize {
        self.feature
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bounds(&self, i: usize) -> (f64, f64) {
        (self.edges[i], self.edges[i + 1])
    }

    pub fn midpoint(&self, i: usize) -> f64 {
        let (lo, hi) = self.bounds(i);
        (lo + hi) / 2.0
    }

    /// Inclusive membership test for a single bin, `lo <= value <= hi`.
    ///
    /// A value sitting exactly on an inner edge belongs to both neighbours
    /// under this test; use [`Intervals::locate`] for a partition.
    pub fn contains(&self, i: usize, value: f64) -> bool {
        let (lo, hi) = self.bounds(i);
        lo <= value && value <= hi
    }

    /// Index of the bin holding `value`. The first bin is closed on both
    /// sides, every later bin is `(lo, hi]`. Values outside the edges
    /// return `None`.
    pub fn locate(&self, value: f64) -> Option<usize> {
        if value == self.edges[0] {
            return Some(0);
        }
        (0..self.len()).find(|&i| {
            let (lo, hi) = self.bounds(i);
            lo < value && value <= hi
        })
    }

    /// Human readable label for bin `i`, e.g. `0.500000000-1.000000000`.
    pub fn label(&self, i: usize) -> String {
        let (lo, hi) = self.bounds(i);
        format!("{:.9}-{:.9}", lo, hi)
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }
}

/// Bin the observed range `[min, max]` of `feature` into `num_intervals`
/// equal-width bins.
pub fn define_intervals(x: &Array2<f64>, feature: usize, num_intervals: usize) -> Result<Intervals> {
    build(x, feature, num_intervals, 0.0)
}

/// Same as [`define_intervals`] but on `[min - EDGE_EPSILON, max + EDGE_EPSILON]`.
pub fn define_widened_intervals(
    x: &Array2<f64>,
    feature: usize,
    num_intervals: usize,
) -> Result<Intervals> {
    build(x, feature, num_intervals, EDGE_EPSILON)
}

fn build(x: &Array2<f64>, feature: usize, num_intervals: usize, epsilon: f64) -> Result<Intervals> {
    if num_intervals < 1 {
        return Err(ExplainError::InvalidIntervalCount {
            count: num_intervals,
        });
    }
    check_feature(x, feature)?;

    let (min, max) = x
        .column(feature)
        .min_max()
        .ok_or(ExplainError::EmptyDataset)?;
    if !min.is_finite() || !max.is_finite() {
        return Err(ExplainError::DegenerateIntervals { feature, min, max });
    }
    let (lo, hi) = (min - epsilon, max + epsilon);

    let mut edges: Vec<f64> = linspace(lo, hi, num_intervals + 1).collect();
    // linspace accumulates rounding error; the last edge must cover the max
    if let Some(last) = edges.last_mut() {
        *last = hi;
    }

    if !edges_are_valid(&edges) {
        return Err(ExplainError::DegenerateIntervals { feature, min, max });
    }

    log::debug!(
        "Feature {}: {} intervals over [{}, {}]",
        feature,
        num_intervals,
        lo,
        hi
    );

    Ok(Intervals { feature, edges })
}

/// Finite and strictly increasing. NaN fails the `<` test.
fn edges_are_valid(edges: &[f64]) -> bool {
    edges.iter().all(|e| e.is_finite()) && edges.windows(2).all(|w| w[0] < w[1])
}

pub(crate) fn check_feature(x: &Array2<f64>, feature: usize) -> Result<()> {
    if feature >= x.ncols() {
        return Err(ExplainError::FeatureIndexOutOfBounds {
            index: feature,
            ncols: x.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column(values: &[f64]) -> Array2<f64> {
        Array2::from_shape_vec((values.len(), 1), values.to_vec()).unwrap()
    }

    #[test]
    fn one_interval_spans_observed_range() {
        let x = single_column(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let intervals = define_intervals(&x, 0, 1).unwrap();
        assert_eq!(intervals.edges(), &[0.0, 4.0]);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals.midpoint(0), 2.0);
        assert_eq!(intervals.labels(), vec!["0.000000000-4.000000000".to_string()]);
    }

    #[test]
    fn widened_edges_enclose_extremes() {
        let x = single_column(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let intervals = define_widened_intervals(&x, 0, 4).unwrap();
        let edges = intervals.edges();
        assert_eq!(edges.len(), 5);
        assert!(edges[0] < 0.0);
        assert!(edges[4] > 4.0);
    }

    #[test]
    fn zero_intervals_rejected() {
        let x = single_column(&[0.0, 1.0]);
        assert!(matches!(
            define_intervals(&x, 0, 0),
            Err(ExplainError::InvalidIntervalCount { count: 0 })
        ));
    }

    #[test]
    fn constant_feature() {
        let x = single_column(&[2.5, 2.5, 2.5]);
        assert!(matches!(
            define_intervals(&x, 0, 3),
            Err(ExplainError::DegenerateIntervals { feature: 0, .. })
        ));
        // the epsilon gives a small but valid range
        let widened = define_widened_intervals(&x, 0, 2).unwrap();
        assert!(widened.locate(2.5).is_some());
    }

    #[test]
    fn infinite_values_are_rejected() {
        let x = single_column(&[f64::NEG_INFINITY, 0.0]);
        assert!(matches!(
            define_intervals(&x, 0, 2),
            Err(ExplainError::DegenerateIntervals { feature: 0, .. })
        ));
        let x = single_column(&[0.0, f64::INFINITY]);
        assert!(define_widened_intervals(&x, 0, 2).is_err());

        // finite but the width overflows to inf, which would give NaN edges
        let x = single_column(&[-f64::MAX, f64::MAX]);
        assert!(matches!(
            define_intervals(&x, 0, 3),
            Err(ExplainError::DegenerateIntervals { .. })
        ));
    }

    #[test]
    fn locate_partitions_values() {
        let x = single_column(&[0.0, 10.0]);
        let intervals = define_intervals(&x, 0, 2).unwrap();
        assert_eq!(intervals.locate(0.0), Some(0));
        assert_eq!(intervals.locate(5.0), Some(0));
        assert_eq!(intervals.locate(5.5), Some(1));
        assert_eq!(intervals.locate(10.0), Some(1));
        assert_eq!(intervals.locate(10.5), None);
        // inclusive test sees the inner edge from both sides
        assert!(intervals.contains(0, 5.0));
        assert!(intervals.contains(1, 5.0));
    }

    #[test]
    fn deserialized_edges_are_validated() {
        let x = single_column(&[0.0, 1.0, 2.0]);
        let intervals = define_intervals(&x, 0, 2).unwrap();
        let json = serde_json::to_string(&intervals).unwrap();
        let back: Intervals = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intervals);

        assert!(serde_json::from_str::<Intervals>(r#"{"feature": 0, "edges": []}"#).is_err());
        assert!(serde_json::from_str::<Intervals>(r#"{"feature": 0, "edges": [1.0]}"#).is_err());
        assert!(serde_json::from_str::<Intervals>(r#"{"feature": 0, "edges": [2.0, 1.0]}"#).is_err());
    }

    #[test]
    fn out_of_bounds_feature() {
        let x = single_column(&[0.0, 1.0]);
        assert!(matches!(
            define_intervals(&x, 3, 2),
            Err(ExplainError::FeatureIndexOutOfBounds { index: 3, ncols: 1 })
        ));
    }
}
