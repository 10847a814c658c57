use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    conflicts::{find_overlaps, pseudoknot_terms},
    model::{linear_objective, merge_pairs, HardPairs, QuadraticModel, SoftPairs},
    types::{Stem, StemGroups, Variable},
};

/// A linear constraint over binary variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Exactly one of `variables` is set. Labeled by the group's maximal
    /// stem; the group's null variable is the last member.
    OneHot { group: Stem, variables: Vec<Variable> },
    /// `x_first + x_second <= 1`
    AtMostOne { first: Stem, second: Stem },
}

impl Constraint {
    /// Whether `assignment` satisfies the constraint; omitted variables count as `0`.
    #[must_use]
    pub fn is_satisfied(&self, assignment: &BTreeMap<Variable, u8>) -> bool {
        let value = |v: &Variable| u32::from(assignment.get(v).copied().unwrap_or(0));
        match self {
            Self::OneHot { variables, .. } => variables.iter().map(value).sum::<u32>() == 1,
            Self::AtMostOne { first, second } => {
                value(&Variable::Stem(*first)) + value(&Variable::Stem(*second)) <= 1
            }
        }
    }
}

/// Objective plus hard constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstrainedModel {
    /// Linear stem weights, zero-weight null variables and pseudoknot terms
    pub objective: QuadraticModel,
    pub constraints: Vec<Constraint>,
}

impl ConstrainedModel {
    #[must_use]
    pub fn is_feasible(&self, assignment: &BTreeMap<Variable, u8>) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.is_satisfied(assignment))
    }

    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Build the constrained model.
///
/// Each group with more than one stem gets a null variable and a one-hot
/// constraint over its stems and the null variable. Every overlapping pair
/// from different groups gets an at-most-one constraint. The objective
/// holds the `-(length)^2` terms and the pseudoknot penalties only.
#[must_use]
pub fn build_constrained_model(
    groups: &StemGroups,
    min_stem: usize,
    pseudoknot_coefficient: f64,
) -> ConstrainedModel {
    if groups.is_empty() {
        warn!("No valid stems found; the model is empty");
        return ConstrainedModel::default();
    }

    let mut linear = linear_objective(groups);
    let mut constraints = Vec::new();

    for group in groups.iter().filter(|group| group.substems.len() > 1) {
        let null = Variable::Null(group.maximal);
        linear.insert(null, 0.0);

        let mut variables: Vec<Variable> = group.substems.iter().map(|&s| s.into()).collect();
        variables.push(null);
        constraints.push(Constraint::OneHot {
            group: group.maximal,
            variables,
        });
    }
    let one_hot = constraints.len();

    constraints.extend(
        find_overlaps(groups)
            .into_iter()
            .map(|(first, second)| Constraint::AtMostOne { first, second }),
    );

    let mut soft = SoftPairs::new();
    for term in pseudoknot_terms(groups, min_stem, pseudoknot_coefficient) {
        soft.add(
            Variable::Stem(term.first),
            Variable::Stem(term.second),
            term.weight,
        );
    }

    debug!(
        "Constrained model: {} one-hot constraints, {} overlap constraints, {} pseudoknot pairs",
        one_hot,
        constraints.len() - one_hot,
        soft.len()
    );

    ConstrainedModel {
        objective: QuadraticModel {
            linear,
            quadratic: merge_pairs(HardPairs::new(), soft),
        },
        constraints,
    }
}
