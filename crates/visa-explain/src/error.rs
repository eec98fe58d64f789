use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

/// Failures raised while computing metrics or interval importance.
///
/// Any failure is fatal to the single invocation: no partial result is
/// returned.
#[derive(Debug)]
pub enum ExplainError {
    /// An interval count below 1 was requested.
    InvalidIntervalCount { count: usize },
    FeatureIndexOutOfBounds { index: usize, ncols: usize },
    /// Joint importance was asked for the same feature twice.
    DuplicateFeature { index: usize },
    /// The binned range is too narrow to produce strictly increasing edges.
    DegenerateIntervals { feature: usize, min: f64, max: f64 },
    EmptyDataset,
    LengthMismatch { expected: usize, found: usize },
    Shape(ShapeError),
    /// Raised by the classifier; message passed through unchanged.
    Prediction(String),
    Config(String),
}

impl fmt::Display for ExplainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExplainError::InvalidIntervalCount { count } => {
                write!(f, "Number of intervals must be at least 1, got {}", count)
            }
            ExplainError::FeatureIndexOutOfBounds { index, ncols } => write!(
                f,
                "Feature index {} is out of bounds for a matrix with {} columns",
                index, ncols
            ),
            ExplainError::DuplicateFeature { index } => write!(
                f,
                "Joint importance needs two distinct features, got {} twice",
                index
            ),
            ExplainError::DegenerateIntervals { feature, min, max } => write!(
                f,
                "Feature {} spans [{}, {}], which is too narrow to split into intervals",
                feature, min, max
            ),
            ExplainError::EmptyDataset => write!(f, "Test set has no rows"),
            ExplainError::LengthMismatch { expected, found } => write!(
                f,
                "Expected {} labels but found {}",
                expected, found
            ),
            ExplainError::Shape(err) => write!(f, "{}", err),
            ExplainError::Prediction(msg) => write!(f, "Prediction failed: {}", msg),
            ExplainError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for ExplainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExplainError::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for ExplainError {
    fn from(err: ShapeError) -> Self {
        ExplainError::Shape(err)
    }
}

pub type Result<T> = std::result::Result<T, ExplainError>;
