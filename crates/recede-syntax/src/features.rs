//! Tiered feature lists.
//!
//! A feature list is an ordered sequence of priority tiers, each an ordered
//! set of feature names. The host enables the first `level` tiers; rules
//! whose feature is not enabled are never applied. Tier membership is what
//! decides precedence, so the list is never flattened.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Name of a highlighting feature (a group of rules toggled together).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureName(Arc<str>);

impl FeatureName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FeatureName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&FeatureName> for FeatureName {
    fn from(name: &FeatureName) -> Self {
        name.clone()
    }
}

/// An ordered sequence of feature tiers, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureList {
    tiers: Vec<Vec<FeatureName>>,
}

impl FeatureList {
    /// Builds a list from tiers. Repeats within a tier are dropped.
    pub fn new<T, F>(tiers: T) -> Self
    where
        T: IntoIterator,
        T::Item: IntoIterator<Item = F>,
        F: Into<FeatureName>,
    {
        let tiers: Vec<Vec<FeatureName>> = tiers
            .into_iter()
            .map(|tier| {
                let mut seen = HashSet::new();
                tier.into_iter()
                    .map(Into::<FeatureName>::into)
                    .filter(|name| seen.insert(name.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Vec<FeatureName>] {
        &self.tiers
    }

    /// The highest-priority tier; empty when the list has no tiers.
    pub fn top_tier(&self) -> &[FeatureName] {
        self.tiers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if any tier holds `feature`.
    pub fn contains(&self, feature: &FeatureName) -> bool {
        self.tiers.iter().any(|tier| tier.contains(feature))
    }

    /// Number of tiers holding `feature`.
    pub fn count(&self, feature: &FeatureName) -> usize {
        self.tiers.iter().filter(|tier| tier.contains(feature)).count()
    }

    /// Returns a copy with `feature` at the front of the top tier.
    ///
    /// When the feature is already in the top tier the copy is unchanged.
    /// An empty list gains a top tier holding just `feature`.
    pub fn with_top_priority(&self, feature: &FeatureName) -> FeatureList {
        let mut tiers = self.tiers.clone();
        match tiers.first_mut() {
            Some(top) if top.contains(feature) => {}
            Some(top) => top.insert(0, feature.clone()),
            None => tiers.push(vec![feature.clone()]),
        }
        Self { tiers }
    }

    /// Features enabled at `level`: the union of the first `level` tiers.
    pub fn effective(&self, level: usize) -> HashSet<FeatureName> {
        self.tiers
            .iter()
            .take(level)
            .flat_map(|tier| tier.iter().cloned())
            .collect()
    }
}
