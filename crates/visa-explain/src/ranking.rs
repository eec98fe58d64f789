//! Ranking of features by the model's built-in importances.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};
use crate::models::ModelDescription;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    /// 1 is the most important feature.
    pub rank: usize,
    /// Column index in the feature matrix.
    pub index: usize,
    pub name: String,
    pub importance: f64,
}

/// Features sorted by absolute importance, most important first. Ties keep
/// column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRanking {
    features: Vec<RankedFeature>,
}

impl FeatureRanking {
    pub fn from_description(description: &ModelDescription) -> Result<Self> {
        if description.feature_names.len() != description.importances.len() {
            return Err(ExplainError::LengthMismatch {
                expected: description.feature_names.len(),
                found: description.importances.len(),
            });
        }

        let mut order: Vec<usize> = (0..description.importances.len()).collect();
        order.sort_by(|&a, &b| {
            let (ia, ib) = (description.importances[a].abs(), description.importances[b].abs());
            ib.partial_cmp(&ia).unwrap_or(Ordering::Equal)
        });

        let features = order
            .into_iter()
            .enumerate()
            .map(|(pos, index)| RankedFeature {
                rank: pos + 1,
                index,
                name: description.feature_names[index].clone(),
                importance: description.importances[index],
            })
            .collect();

        Ok(FeatureRanking { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[RankedFeature] {
        &self.features
    }

    /// The `k` highest ranked features; `k` is clamped to `[1, len]`.
    pub fn top(&self, k: usize) -> &[RankedFeature] {
        let k = k.clamp(1, self.features.len().max(1)).min(self.features.len());
        &self.features[..k]
    }

    /// A third of the features, at least one.
    pub fn default_top(&self) -> usize {
        (self.features.len() / 3).max(1)
    }

    /// Column indices of the two most important features, used as the
    /// initial selection for joint importance.
    pub fn default_pair(&self) -> Option<(usize, usize)> {
        match self.features.as_slice() {
            [first, second, ..] => Some((first.index, second.index)),
            _ => None,
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.features.iter().find(|f| f.name == name).map(|f| f.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> ModelDescription {
        ModelDescription {
            feature_names: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            importances: vec![0.1, -0.5, 0.3, 0.1],
        }
    }

    #[test]
    fn ranks_by_absolute_importance() {
        let ranking = FeatureRanking::from_description(&description()).unwrap();
        let names: Vec<&str> = ranking.features().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
        let ranks: Vec<usize> = ranking.features().iter().map(|f| f.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(ranking.default_pair(), Some((1, 2)));
        assert_eq!(ranking.index_of("d"), Some(3));
        assert_eq!(ranking.index_of("z"), None);
    }

    #[test]
    fn top_is_clamped() {
        let ranking = FeatureRanking::from_description(&description()).unwrap();
        assert_eq!(ranking.top(0).len(), 1);
        assert_eq!(ranking.top(2).len(), 2);
        assert_eq!(ranking.top(10).len(), 4);
        assert_eq!(ranking.default_top(), 1);
    }

    #[test]
    fn mismatched_description_is_rejected() {
        let mut desc = description();
        desc.importances.pop();
        assert!(FeatureRanking::from_description(&desc).is_err());
    }
}
