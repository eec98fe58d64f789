pub mod classifier_trait;
pub mod gbdt;

pub use classifier_trait::{Classifier, ModelDescription};
pub use gbdt::GBDTClassifier;
