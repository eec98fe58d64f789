//! Small ndarray-like containers used throughout the crate.
//!
//! `Array2` holds the feature matrix (rows are samples) and the joint
//! difference matrices; `Array1` holds label vectors and per-interval
//! series. Perturbation always works on cloned copies, never in place on
//! caller data.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
