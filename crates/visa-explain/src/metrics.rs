//! Classification metrics shared by both importance routines.
//!
//! Precision, recall and F1 are averaged across classes weighted by their
//! support in `y_true` (scikit-learn's `average='weighted'`). A class with
//! no predicted or no true samples contributes 0 instead of failing.
use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::math::{Array1, Array2};
use crate::models::classifier_trait::{predict_checked, Classifier};

/// The four metrics tracked by every importance computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Precision,
    Recall,
    F1,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Accuracy, Metric::Precision, Metric::Recall, Metric::F1];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "Accuracy",
            Metric::Precision => "Precision",
            Metric::Recall => "Recall",
            Metric::F1 => "F1 Score",
        }
    }
}

/// One value per [`Metric`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerMetric<T> {
    pub accuracy: T,
    pub precision: T,
    pub recall: T,
    pub f1: T,
}

/// Accuracy plus weighted precision / recall / F1, each in `[0, 1]`.
pub type MetricBundle = PerMetric<f64>;

impl<T> PerMetric<T> {
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Metric) -> T,
    {
        PerMetric {
            accuracy: f(Metric::Accuracy),
            precision: f(Metric::Precision),
            recall: f(Metric::Recall),
            f1: f(Metric::F1),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Accuracy => &self.accuracy,
            Metric::Precision => &self.precision,
            Metric::Recall => &self.recall,
            Metric::F1 => &self.f1,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Accuracy => &mut self.accuracy,
            Metric::Precision => &mut self.precision,
            Metric::Recall => &mut self.recall,
            Metric::F1 => &mut self.f1,
        }
    }

    pub fn map<U, F>(&self, mut f: F) -> PerMetric<U>
    where
        F: FnMut(Metric, &T) -> U,
    {
        PerMetric::from_fn(|metric| f(metric, self.get(metric)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().map(move |metric| (metric, self.get(metric)))
    }
}

/// Row-major confusion matrix. Entry `(i, j)` counts samples whose true
/// class is `classes()[i]` and predicted class is `classes()[j]`.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    classes: Vec<usize>,
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// Classes are the sorted distinct labels seen in either vector, so
    /// sparse or very large label values only cost one row each.
    pub fn from_labels(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ExplainError::LengthMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(ExplainError::EmptyDataset);
        }

        let classes = unique_labels(y_true.iter().chain(y_pred.iter()).copied());
        let n_classes = classes.len();
        let mut counts = Array2::from_elem((n_classes, n_classes), 0usize);
        for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
            counts[(class_index(&classes, actual), class_index(&classes, predicted))] += 1;
        }

        Ok(ConfusionMatrix { classes, counts })
    }

    /// Label of every row / column, ascending.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.counts.nrows()
    }

    /// Count at class positions (indices into [`ConfusionMatrix::classes`]),
    /// not raw labels.
    pub fn get(&self, actual: usize, predicted: usize) -> usize {
        self.counts[(actual, predicted)]
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.get(class, class)
    }

    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&i| i != class)
            .map(|i| self.get(i, class))
            .sum()
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&j| j != class)
            .map(|j| self.get(class, j))
            .sum()
    }

    /// Number of samples whose true class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.counts.row_slice(class).iter().sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes()).map(|c| self.get(c, c)).sum();
        correct as f64 / total as f64
    }

    pub fn precision(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.true_positives(class) + self.false_positives(class))
    }

    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.true_positives(class), self.true_positives(class) + self.false_negatives(class))
    }

    pub fn f1(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        ratio(2 * tp, 2 * tp + self.false_positives(class) + self.false_negatives(class))
    }

    /// Average a per-class score weighted by true-class support.
    fn weighted<F>(&self, score: F) -> f64
    where
        F: Fn(usize) -> f64,
    {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted_sum: f64 = (0..self.n_classes())
            .map(|c| (c, self.support(c)))
            .filter(|&(_, support)| support > 0)
            .map(|(c, support)| support as f64 * score(c))
            .sum();
        weighted_sum / total as f64
    }

    pub fn metrics(&self) -> MetricBundle {
        MetricBundle {
            accuracy: self.accuracy(),
            precision: self.weighted(|c| self.precision(c)),
            recall: self.weighted(|c| self.recall(c)),
            f1: self.weighted(|c| self.f1(c)),
        }
    }

    /// Divide each row by its support so rows sum to 1. Classes that never
    /// occur in `y_true` keep an all-zero row.
    pub fn normalized_by_true(&self) -> Array2<f64> {
        let n = self.n_classes();
        let mut out = Array2::from_elem((n, n), 0.0);
        for actual in 0..n {
            let support = self.support(actual);
            if support == 0 {
                continue;
            }
            for predicted in 0..n {
                out[(actual, predicted)] = self.get(actual, predicted) as f64 / support as f64;
            }
        }
        out
    }
}

/// Sorted distinct labels.
pub(crate) fn unique_labels<I>(labels: I) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut classes: Vec<usize> = labels.into_iter().collect();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Position of `label` in the sorted `classes`; the label must be present.
pub(crate) fn class_index(classes: &[usize], label: usize) -> usize {
    classes.partition_point(|&c| c < label)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compute the metric bundle for a set of predictions.
pub fn evaluate(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<MetricBundle> {
    Ok(ConfusionMatrix::from_labels(y_true, y_pred)?.metrics())
}

/// Predict on the unperturbed test set and evaluate. This is the reference
/// point every importance delta is measured against.
pub fn baseline_metrics<M>(model: &M, x: &Array2<f64>, y: &Array1<usize>) -> Result<MetricBundle>
where
    M: Classifier + ?Sized,
{
    let y_pred = predict_checked(model, x)?;
    let baseline = evaluate(y, &y_pred)?;
    log::debug!(
        "Baseline metrics for {}: accuracy={:.4}, precision={:.4}, recall={:.4}, f1={:.4}",
        model.name(),
        baseline.accuracy,
        baseline.precision,
        baseline.recall,
        baseline.f1
    );
    Ok(baseline)
}
