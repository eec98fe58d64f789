//! Interval-perturbation feature importance.
//!
//! Both routines measure how much the classifier's metrics move when a
//! feature's values are rewritten to points inside equal-width intervals of
//! its observed range. `single` works on one feature and reports signed
//! drops per interval; `joint` sweeps a grid over two features and reports
//! absolute changes per cell.
use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::math::{Array1, Array2};

pub mod joint;
pub mod single;

pub use joint::{joint_interval_importance, JointImportance, DIFF_FLOOR};
pub use single::{interval_importance, IntervalImportance};

/// Value written into rows that fall outside the interval being perturbed
/// by single-feature importance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Take the row's value from column 0. This is what the dashboard has
    /// always done and it is kept for identical results, even though it
    /// rewrites out-of-interval rows whenever the feature is not column 0.
    #[default]
    FirstColumn,
    /// Leave out-of-interval rows untouched.
    OriginalValue,
}

pub(crate) fn check_test_set(x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
    if x.is_empty() {
        return Err(ExplainError::EmptyDataset);
    }
    if x.nrows() != y.len() {
        return Err(ExplainError::LengthMismatch {
            expected: x.nrows(),
            found: y.len(),
        });
    }
    Ok(())
}
