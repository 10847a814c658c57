use log::{debug, warn};

use crate::{
    conflicts::{find_overlaps, pseudoknot_terms},
    constants::PENALTY_WEIGHT_MARGIN,
    model::{linear_objective, merge_pairs, HardPairs, QuadraticModel, SoftPairs},
    types::{StemGroups, Variable},
};

/// Overlap penalty derived from the enumerated stems: `(longest)^2 + 3`.
///
/// The longest stem contributes `-(longest)^2` to the energy, so the margin
/// keeps any conflicting pair more expensive than whatever it could gain.
#[must_use]
pub fn default_penalty_weight(groups: &StemGroups) -> f64 {
    let longest = groups.longest_stem_length().unwrap_or(0) as f64;
    longest * longest + PENALTY_WEIGHT_MARGIN
}

/// Build the unconstrained binary quadratic model.
///
/// Linear terms are `-(length)^2`. `penalty_weight` is placed on every pair
/// of distinct stems in the same group and on every overlapping pair from
/// different groups; crossing pairs get their soft pseudoknot weight on top.
/// No candidate stems gives an empty model.
#[must_use]
pub fn build_penalty_model(
    groups: &StemGroups,
    min_stem: usize,
    pseudoknot_coefficient: f64,
    penalty_weight: f64,
) -> QuadraticModel {
    if groups.is_empty() {
        warn!("No valid stems found; the model is empty");
        return QuadraticModel::default();
    }

    let mut hard = HardPairs::new();
    for group in groups {
        for (i, &s1) in group.substems.iter().enumerate() {
            for &s2 in &group.substems[i + 1..] {
                hard.insert(s1.into(), s2.into(), penalty_weight);
            }
        }
    }
    for (s1, s2) in find_overlaps(groups) {
        hard.insert(s1.into(), s2.into(), penalty_weight);
    }

    let mut soft = SoftPairs::new();
    for term in pseudoknot_terms(groups, min_stem, pseudoknot_coefficient) {
        soft.add(
            Variable::Stem(term.first),
            Variable::Stem(term.second),
            term.weight,
        );
    }

    debug!(
        "Penalty model: {} conflict pairs, {} pseudoknot pairs, weight {}",
        hard.len(),
        soft.len(),
        penalty_weight
    );

    QuadraticModel {
        linear: linear_objective(groups),
        quadratic: merge_pairs(hard, soft),
    }
}
