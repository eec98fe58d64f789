use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::math::{Array1, Array2};

/// Built-in importance introspection of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    pub feature_names: Vec<String>,
    pub importances: Vec<f64>,
}

/// A trained classifier as seen by the importance routines.
///
/// The caller owns the model; importance computations only ever call
/// `predict` on perturbed copies of the test set and never retrain it.
/// Labels are integer-encoded class ids.
pub trait Classifier {
    /// Predict one class id per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Feature names and built-in importances, in column order.
    fn describe(&self) -> ModelDescription;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Predict and make sure the model returned one label per row.
pub(crate) fn predict_checked<M>(model: &M, x: &Array2<f64>) -> Result<Array1<usize>>
where
    M: Classifier + ?Sized,
{
    let y_pred = model.predict(x)?;
    if y_pred.len() != x.nrows() {
        return Err(ExplainError::Prediction(format!(
            "{} returned {} predictions for {} rows",
            model.name(),
            y_pred.len(),
            x.nrows()
        )));
    }
    Ok(y_pred)
}
