//! Univariate feature scoring following scikit-learn's API.
//!
//! See: https://scikit-learn.org/stable/modules/feature_selection.html#univariate-feature-selection

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::error::{ExplainError, Result};
use crate::math::{Array1, Array2};
use crate::metrics::{class_index, unique_labels};

/// ANOVA F-test of each feature against a categorical target.
///
/// For every column the between-class variance is compared to the
/// within-class variance of the samples grouped by their label.
///
/// # Parameters
///
/// * `x` - A 2D array of shape (n_samples, n_features).
/// * `y` - Integer-encoded class labels of shape (n_samples,).
///
/// # Returns
///
/// A tuple of F-statistics and p-values, one per feature. Non-finite
/// results are forced finite: an infinite F becomes `f64::MAX` with a p-value
/// of 0, an undefined F becomes 0 with a p-value of 1.
pub fn f_classif(x: &Array2<f64>, y: &Array1<usize>) -> Result<(Array1<f64>, Array1<f64>)> {
    if x.nrows() != y.len() {
        return Err(ExplainError::LengthMismatch {
            expected: x.nrows(),
            found: y.len(),
        });
    }
    if x.is_empty() {
        return Err(ExplainError::EmptyDataset);
    }

    let n_samples = x.nrows();
    let classes = unique_labels(y.iter().copied());
    let groups: Vec<usize> = y.iter().map(|&label| class_index(&classes, label)).collect();
    let mut class_counts = vec![0usize; classes.len()];
    for &group in &groups {
        class_counts[group] += 1;
    }
    let k = classes.len();

    let df_between = k as f64 - 1.0;
    let df_within = n_samples as f64 - k as f64;
    let f_dist = FisherSnedecor::new(df_between, df_within).ok();

    let mut f_statistic = Array1::zeros(x.ncols());
    let mut p_values = Array1::from_elem(x.ncols(), 1.0);

    for col in 0..x.ncols() {
        let values = x.column(col);

        let mut class_sums = vec![0.0f64; k];
        for (&v, &group) in values.iter().zip(groups.iter()) {
            class_sums[group] += v;
        }
        let grand_mean = values.iter().sum::<f64>() / n_samples as f64;

        let mut ss_between = 0.0;
        for (class, &count) in class_counts.iter().enumerate() {
            let class_mean = class_sums[class] / count as f64;
            ss_between += count as f64 * (class_mean - grand_mean).powi(2);
        }

        let mut ss_within = 0.0;
        for (&v, &group) in values.iter().zip(groups.iter()) {
            let class_mean = class_sums[group] / class_counts[group] as f64;
            ss_within += (v - class_mean).powi(2);
        }

        let f = (ss_between / df_between) / (ss_within / df_within);

        if f.is_nan() {
            f_statistic[col] = 0.0;
            p_values[col] = 1.0;
        } else if f.is_infinite() {
            f_statistic[col] = f64::MAX;
            p_values[col] = 0.0;
        } else {
            f_statistic[col] = f;
            p_values[col] = f_dist.as_ref().map(|d| 1.0 - d.cdf(f)).unwrap_or(1.0);
        }
    }

    Ok((f_statistic, p_values))
}

/// Scale non-negative scores so they sum to 1. All-zero input stays zero.
pub fn normalize_scores(scores: &Array1<f64>) -> Array1<f64> {
    // f64::MAX entries would overflow the sum
    let capped = scores.mapv(|&s| if s.is_finite() { s.max(0.0).min(f64::MAX / 1e6) } else { 0.0 });
    let total: f64 = capped.iter().sum();
    if total <= 0.0 {
        return Array1::zeros(scores.len());
    }
    capped.mapv(|&s| s / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f_classif() {
        // Features: [separates classes, constant, noise]
        let x = Array2::from_rows(vec![
            vec![0.1, 5.0, 0.3],
            vec![0.2, 5.0, -0.1],
            vec![0.0, 5.0, 0.2],
            vec![1.1, 5.0, 0.1],
            vec![0.9, 5.0, -0.2],
            vec![1.0, 5.0, 0.0],
        ])
        .unwrap();
        let y = Array1::from_vec(vec![0, 0, 0, 1, 1, 1]);

        let (f, p) = f_classif(&x, &y).unwrap();

        assert!(f[0] > 100.0);
        assert!(p[0] < 0.001);
        // constant column has no variance at all
        assert_eq!(f[1], 0.0);
        assert_eq!(p[1], 1.0);
        assert!(f[2] < f[0]);
    }

    #[test]
    fn sparse_labels_group_like_dense_ones() {
        let x = Array2::from_rows(vec![vec![0.1], vec![0.2], vec![1.1], vec![0.9]]).unwrap();
        let dense = Array1::from_vec(vec![0, 0, 1, 1]);
        let sparse = Array1::from_vec(vec![7, 7, usize::MAX, usize::MAX]);

        let (f_dense, p_dense) = f_classif(&x, &dense).unwrap();
        let (f_sparse, p_sparse) = f_classif(&x, &sparse).unwrap();
        assert_eq!(f_dense, f_sparse);
        assert_eq!(p_dense, p_sparse);
    }

    #[test]
    fn normalized_scores_sum_to_one() {
        let scores = Array1::from_vec(vec![3.0, 1.0, 0.0, f64::MAX]);
        let norm = normalize_scores(&scores);
        let sum: f64 = norm.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(norm[3] > norm[0]);

        let zeros = normalize_scores(&Array1::from_vec(vec![0.0, 0.0]));
        assert_eq!(zeros.to_vec(), vec![0.0, 0.0]);
    }
}
