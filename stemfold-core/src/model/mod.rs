//! Stem-selection models handed to an external solver.
//!
//! ## Overview
//!
//! Every candidate stem becomes a binary variable whose linear weight is
//! `-(length)^2`, so minimizing the energy favors long stems. Structural
//! conflicts are expressed in one of two encodings:
//!
//! - [`build_penalty_model`]: conflicts are large quadratic penalties
//!   (overlapping stems and stems of the same group).
//! - [`build_constrained_model`]: conflicts are constraints (one selection
//!   per group and an exclusion per overlapping pair).
//!
//! Both encodings add the soft pseudoknot penalties from
//! [`pseudoknot_terms`](crate::conflicts::pseudoknot_terms) as quadratic
//! terms.
//!
//! ## Examples
//!
//! ```rust
//! use stemfold_core::model::{build_penalty_model, default_penalty_weight};
//! use stemfold_core::sequence::encoded::EncodedSequence;
//! use stemfold_core::stems::enumerate_stems;
//!
//! let encoded = EncodedSequence::new(b"gggaaaccc", 2)?;
//! let groups = enumerate_stems(&encoded.bonds, 3, 2);
//! let weight = default_penalty_weight(&groups);
//!
//! let model = build_penalty_model(&groups, 3, 0.3, weight);
//! assert_eq!(model.num_variables(), 1);
//! assert_eq!(model.linear.values().next(), Some(&-9.0));
//! # Ok::<(), stemfold_core::types::FoldError>(())
//! ```

use std::collections::BTreeMap;

use crate::{
    config::ModelEncoding,
    types::{StemGroups, Variable},
};

mod constrained;
mod penalty;
mod terms;

pub use constrained::{build_constrained_model, ConstrainedModel, Constraint};
pub use penalty::{build_penalty_model, default_penalty_weight};
pub use terms::{merge_pairs, pair_key, HardPairs, PairKey, SoftPairs};

/// Binary quadratic model over stem and null variables.
///
/// Energy of an assignment `x` is `sum(linear[v] * x_v) + sum(quadratic[(u, v)] * x_u * x_v)`.
/// Quadratic keys are normalized with [`pair_key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadraticModel {
    pub linear: BTreeMap<Variable, f64>,
    pub quadratic: BTreeMap<PairKey, f64>,
}

impl QuadraticModel {
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    #[must_use]
    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    #[must_use]
    pub fn contains(&self, variable: &Variable) -> bool {
        self.linear.contains_key(variable)
    }

    /// Quadratic weight between `u` and `v`, if any.
    #[must_use]
    pub fn interaction(&self, u: Variable, v: Variable) -> Option<f64> {
        self.quadratic.get(&pair_key(u, v)).copied()
    }

    /// Energy of `assignment`; variables it omits count as `0`.
    #[must_use]
    pub fn energy(&self, assignment: &BTreeMap<Variable, u8>) -> f64 {
        let value = |v: &Variable| f64::from(assignment.get(v).copied().unwrap_or(0));

        let linear: f64 = self.linear.iter().map(|(v, bias)| bias * value(v)).sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .map(|((u, v), bias)| bias * value(u) * value(v))
            .sum();
        linear + quadratic
    }
}

/// A model in either encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltModel {
    Penalty(QuadraticModel),
    Constrained(ConstrainedModel),
}

impl BuiltModel {
    #[must_use]
    pub const fn encoding(&self) -> ModelEncoding {
        match self {
            Self::Penalty(_) => ModelEncoding::Penalty,
            Self::Constrained(_) => ModelEncoding::Constrained,
        }
    }

    /// The quadratic objective (the whole model for the penalty encoding).
    #[must_use]
    pub const fn objective(&self) -> &QuadraticModel {
        match self {
            Self::Penalty(model) => model,
            Self::Constrained(model) => &model.objective,
        }
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            Self::Penalty(_) => &[],
            Self::Constrained(model) => &model.constraints,
        }
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.objective().num_variables()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objective().is_empty()
    }
}

/// `-(length)^2` for every candidate stem.
pub(crate) fn linear_objective(groups: &StemGroups) -> BTreeMap<Variable, f64> {
    groups
        .all_stems()
        .map(|stem| {
            let length = stem.length() as f64;
            (Variable::Stem(stem), -(length * length))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stem;
    use approx::assert_relative_eq;

    #[test]
    fn test_energy_counts_selected_terms() {
        let u = Variable::Stem(Stem::new(0, 2, 10, 12).unwrap());
        let v = Variable::Stem(Stem::new(1, 3, 9, 11).unwrap());
        let model = QuadraticModel {
            linear: BTreeMap::from([(u, -9.0), (v, -9.0)]),
            quadratic: BTreeMap::from([(pair_key(u, v), 19.0)]),
        };

        let none = BTreeMap::new();
        let one = BTreeMap::from([(u, 1), (v, 0)]);
        let both = BTreeMap::from([(u, 1), (v, 1)]);

        assert_relative_eq!(model.energy(&none), 0.0);
        assert_relative_eq!(model.energy(&one), -9.0);
        assert_relative_eq!(model.energy(&both), 1.0);
        assert_eq!(model.interaction(v, u), Some(19.0));
    }

    #[test]
    fn test_built_model_accessors() {
        let model = BuiltModel::Penalty(QuadraticModel::default());
        assert_eq!(model.encoding(), ModelEncoding::Penalty);
        assert!(model.constraints().is_empty());
        assert!(model.is_empty());
    }
}
