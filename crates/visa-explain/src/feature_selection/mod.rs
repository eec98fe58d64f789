//! Feature scoring utilities.
//!
//! Univariate scores (a la scikit-learn) used as the built-in importances of
//! models that do not expose their own.
pub mod univariate_selection;
