use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExplainError, Result};
use crate::importance::FallbackPolicy;

/// Configuration of the bundled model adapter.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 6,
            num_boost_round: 50,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelType::default()),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}

/// Parameters of an importance session. Interval counts are bounded by
/// `max_intervals` since joint importance costs `n1 * n2` full predictions.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImportanceConfig {
    /// Bins used by single-feature interval importance.
    pub num_intervals: usize,
    /// Bins for (first feature, second feature) in joint importance.
    pub joint_intervals: (usize, usize),
    pub max_intervals: usize,
    pub fallback: FallbackPolicy,
    /// Number of top-ranked features to report from the model's built-in
    /// importances. `None` shows a third of the features.
    pub top_features: Option<usize>,
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        ImportanceConfig {
            num_intervals: 10,
            joint_intervals: (3, 3),
            max_intervals: 20,
            fallback: FallbackPolicy::FirstColumn,
            top_features: None,
        }
    }
}

impl ImportanceConfig {
    /// Read a JSON config. Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            ExplainError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config: ImportanceConfig = serde_json::from_str(&raw).map_err(|e| {
            ExplainError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (n1, n2) = self.joint_intervals;
        for count in [self.num_intervals, n1, n2] {
            if count < 1 {
                return Err(ExplainError::InvalidIntervalCount { count });
            }
            if count > self.max_intervals {
                return Err(ExplainError::Config(format!(
                    "{} intervals requested, at most {} allowed",
                    count, self.max_intervals
                )));
            }
        }
        if self.top_features == Some(0) {
            return Err(ExplainError::Config(
                "top_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ImportanceConfig::default().validate().is_ok());
    }

    #[test]
    fn interval_counts_are_bounded() {
        let mut config = ImportanceConfig::default();
        config.joint_intervals = (21, 3);
        assert!(matches!(config.validate(), Err(ExplainError::Config(_))));

        config.joint_intervals = (3, 0);
        assert!(matches!(
            config.validate(),
            Err(ExplainError::InvalidIntervalCount { count: 0 })
        ));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ImportanceConfig =
            serde_json::from_str(r#"{"num_intervals": 4, "fallback": "original_value"}"#).unwrap();
        assert_eq!(config.num_intervals, 4);
        assert_eq!(config.fallback, FallbackPolicy::OriginalValue);
        assert_eq!(config.joint_intervals, (3, 3));
    }
}
