use std::collections::BTreeMap;

use crate::types::Variable;

/// Unordered variable pair, stored with the smaller variable first.
pub type PairKey = (Variable, Variable);

/// Normalize `(u, v)` so that `u <= v`.
#[inline]
#[must_use]
pub fn pair_key(u: Variable, v: Variable) -> PairKey {
    if u <= v { (u, v) } else { (v, u) }
}

/// Conflict penalties: overlapping stems and stems of the same group.
///
/// Every pair carries the overlap weight. Inserting a pair twice keeps a
/// single entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardPairs {
    weights: BTreeMap<PairKey, f64>,
}

impl HardPairs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, u: Variable, v: Variable, weight: f64) {
        self.weights.insert(pair_key(u, v), weight);
    }

    #[must_use]
    pub fn contains(&self, key: &PairKey) -> bool {
        self.weights.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &f64)> {
        self.weights.iter()
    }
}

/// Soft pseudoknot penalties; repeated pairs accumulate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoftPairs {
    weights: BTreeMap<PairKey, f64>,
}

impl SoftPairs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, u: Variable, v: Variable, weight: f64) {
        *self.weights.entry(pair_key(u, v)).or_insert(0.0) += weight;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &f64)> {
        self.weights.iter()
    }
}

/// Additive union of hard and soft pairs.
///
/// A crossing pair never shares nucleotides, so the two key sets are
/// disjoint; debug builds check it.
#[must_use]
pub fn merge_pairs(hard: HardPairs, soft: SoftPairs) -> BTreeMap<PairKey, f64> {
    debug_assert!(
        soft.weights.keys().all(|key| !hard.contains(key)),
        "soft and hard pair sets intersect"
    );

    let mut merged = hard.weights;
    for (key, weight) in soft.weights {
        *merged.entry(key).or_insert(0.0) += weight;
    }
    merged
}
