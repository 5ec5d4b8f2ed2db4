//! Contribution weights: how much each provider agreed with the final answer.

use crate::core::provider::ProviderName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider → percentage share of the final answer.
///
/// Non-empty maps always sum to 100 (up to floating point rounding).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contributions(BTreeMap<ProviderName, f64>);

impl Contributions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Weights proportional to similarity.
    ///
    /// Zero or negative similarities earn 0%. When no provider has a
    /// positive similarity, every listed provider gets an equal share.
    pub fn from_similarities<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (ProviderName, f64)>,
    {
        let scores: Vec<(ProviderName, f64)> = scores.into_iter().collect();
        if scores.is_empty() {
            return Self::empty();
        }

        let total: f64 = scores.iter().map(|(_, s)| s.max(0.0)).sum();
        if total <= 0.0 || !total.is_finite() {
            return Self::equal_split(scores.into_iter().map(|(name, _)| name));
        }

        Self(
            scores
                .into_iter()
                .map(|(name, score)| (name, score.max(0.0) / total * 100.0))
                .collect(),
        )
    }

    /// Equal share for every participant, used when no similarity is available.
    pub fn equal_split<I>(participants: I) -> Self
    where
        I: IntoIterator<Item = ProviderName>,
    {
        let names: Vec<ProviderName> = participants.into_iter().collect();
        if names.is_empty() {
            return Self::empty();
        }
        let share = 100.0 / names.len() as f64;
        Self(names.into_iter().map(|name| (name, share)).collect())
    }

    pub fn get(&self, provider: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name.as_str() == provider)
            .map(|(_, pct)| *pct)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProviderName, &f64)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ProviderName {
        ProviderName::new(s)
    }

    #[test]
    fn test_proportional_weights_sum_to_100() {
        let c = Contributions::from_similarities(vec![
            (name("A"), 1.0),
            (name("B"), 0.5),
            (name("C"), 0.5),
        ]);
        assert!((c.get("A").unwrap() - 50.0).abs() < 1e-9);
        assert!((c.get("B").unwrap() - 25.0).abs() < 1e-9);
        assert!((c.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_similarity_gets_zero() {
        let c = Contributions::from_similarities(vec![(name("A"), 0.8), (name("B"), -0.3)]);
        assert_eq!(c.get("B"), Some(0.0));
        assert!((c.get("A").unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_falls_back_to_equal_split() {
        let c = Contributions::from_similarities(vec![
            (name("A"), 0.0),
            (name("B"), -0.2),
            (name("C"), 0.0),
            (name("D"), 0.0),
        ]);
        assert_eq!(c.len(), 4);
        assert!((c.get("B").unwrap() - 25.0).abs() < 1e-9);
        assert!((c.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        assert!(Contributions::from_similarities(Vec::new()).is_empty());
        assert!(Contributions::equal_split(Vec::new()).is_empty());
    }

    #[test]
    fn test_equal_split_of_three() {
        let c = Contributions::equal_split(vec![name("A"), name("B"), name("C")]);
        assert!((c.get("C").unwrap() - 100.0 / 3.0).abs() < 1e-9);
        assert!((c.total() - 100.0).abs() < 1e-9);
    }
}
