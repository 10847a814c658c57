//! Turning solver samples into a selected secondary structure.
//!
//! A solver returns a [`SampleSet`]: assignments with their energy, an
//! occurrence count and, for constrained models, a feasibility flag. The
//! set is aggregated and ranked by energy, then the first acceptable
//! candidate is selected:
//!
//! - penalty models: the first candidate whose selected stems do not overlap
//! - constrained models: the first candidate flagged feasible
//!
//! When no candidate qualifies the outcome is [`SolutionOutcome::AllInfeasible`].

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    conflicts::{is_pseudoknot, stems_overlap},
    model::{BuiltModel, ConstrainedModel},
    types::{FoldError, Stem, Variable},
};

mod sampler;

pub use sampler::{RecordedSampler, Sampler};

/// Binary value of every variable in a sample.
pub type Assignment = BTreeMap<Variable, u8>;

const fn single_occurrence() -> usize {
    1
}

/// One solver candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub assignment: Assignment,
    pub energy: f64,
    #[serde(default = "single_occurrence")]
    pub num_occurrences: usize,
    /// Feasibility reported by a constrained solver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_feasible: Option<bool>,
}

impl Sample {
    #[must_use]
    pub fn new(assignment: Assignment, energy: f64) -> Self {
        Self {
            assignment,
            energy,
            num_occurrences: 1,
            is_feasible: None,
        }
    }

    #[must_use]
    pub fn with_feasibility(mut self, is_feasible: bool) -> Self {
        self.is_feasible = Some(is_feasible);
        self
    }

    /// Stems set to `1`, in ascending order. Null variables are excluded.
    #[must_use]
    pub fn selected_stems(&self) -> Vec<Stem> {
        self.assignment
            .iter()
            .filter(|&(_, &value)| value == 1)
            .filter_map(|(variable, _)| variable.stem())
            .collect()
    }
}

/// Candidates returned by a solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub samples: Vec<Sample>,
}

impl SampleSet {
    #[must_use]
    pub const fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Merge identical assignments and rank by increasing energy.
    ///
    /// Occurrences of merged samples are summed; energy and feasibility of
    /// the first occurrence are kept. Equal energies keep input order.
    #[must_use]
    pub fn aggregate(self) -> Self {
        let mut merged: Vec<Sample> = Vec::with_capacity(self.samples.len());
        let mut index: BTreeMap<Assignment, usize> = BTreeMap::new();

        for sample in self.samples {
            match index.get(&sample.assignment) {
                Some(&position) => merged[position].num_occurrences += sample.num_occurrences,
                None => {
                    index.insert(sample.assignment.clone(), merged.len());
                    merged.push(sample);
                }
            }
        }

        merged.sort_by(|a, b| a.energy.total_cmp(&b.energy));
        Self { samples: merged }
    }
}

/// The structure picked from a sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldingSolution {
    /// Selected stems in ascending order
    pub stems: Vec<Stem>,
    pub energy: f64,
    /// Crossing pairs among the selected stems, first stem leading
    pub pseudoknots: Vec<(Stem, Stem)>,
    /// Number of variables in the chosen assignment
    pub num_variables: usize,
}

impl FoldingSolution {
    fn from_sample(sample: &Sample) -> Self {
        let stems = sample.selected_stems();
        let pseudoknots = selected_pseudoknots(&stems);
        Self {
            stems,
            energy: sample.energy,
            pseudoknots,
            num_variables: sample.assignment.len(),
        }
    }

    #[must_use]
    pub fn num_stems(&self) -> usize {
        self.stems.len()
    }
}

/// Result of processing a sample set.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionOutcome {
    Selected(FoldingSolution),
    /// No candidate was acceptable; different parameters may help
    AllInfeasible,
}

impl SolutionOutcome {
    #[must_use]
    pub const fn solution(&self) -> Option<&FoldingSolution> {
        match self {
            Self::Selected(solution) => Some(solution),
            Self::AllInfeasible => None,
        }
    }

    /// Convert to a `Result`, mapping the infeasible outcome to
    /// [`FoldError::AllCandidatesInfeasible`].
    pub fn into_result(self) -> Result<FoldingSolution, FoldError> {
        match self {
            Self::Selected(solution) => Ok(solution),
            Self::AllInfeasible => Err(FoldError::AllCandidatesInfeasible),
        }
    }
}

/// Every crossing pair among `stems`, tested in both orders.
#[must_use]
pub fn selected_pseudoknots(stems: &[Stem]) -> Vec<(Stem, Stem)> {
    let mut pairs = Vec::new();
    for s1 in stems {
        for s2 in stems {
            if is_pseudoknot(s1, s2) {
                pairs.push((*s1, *s2));
            }
        }
    }
    pairs
}

fn has_overlap(stems: &[Stem]) -> bool {
    stems
        .iter()
        .enumerate()
        .any(|(i, s1)| stems[i + 1..].iter().any(|s2| stems_overlap(s1, s2)))
}

/// Select from the samples of a penalty model.
///
/// Candidates are aggregated and ranked; the first whose selected stems do
/// not overlap wins. Rejected candidates are logged.
#[must_use]
pub fn process_penalty_samples(samples: SampleSet) -> SolutionOutcome {
    for (rank, sample) in samples.aggregate().iter().enumerate() {
        if has_overlap(&sample.selected_stems()) {
            warn!(
                "Candidate {} (energy {}) selects overlapping stems; trying the next one",
                rank + 1,
                sample.energy
            );
            continue;
        }
        return SolutionOutcome::Selected(FoldingSolution::from_sample(sample));
    }

    warn!("Every candidate selects overlapping stems; consider changing the parameters");
    SolutionOutcome::AllInfeasible
}

/// Select from the samples of a constrained model.
///
/// The first candidate flagged feasible wins. Samples without a flag are
/// checked against the model's constraints.
#[must_use]
pub fn process_constrained_samples(
    samples: SampleSet,
    model: &ConstrainedModel,
) -> SolutionOutcome {
    let feasible = samples.aggregate().samples.into_iter().find(|sample| {
        sample
            .is_feasible
            .unwrap_or_else(|| model.is_feasible(&sample.assignment))
    });

    match feasible {
        Some(sample) => SolutionOutcome::Selected(FoldingSolution::from_sample(&sample)),
        None => {
            warn!("No feasible candidate returned; consider changing the parameters");
            SolutionOutcome::AllInfeasible
        }
    }
}

/// Sample `model` and select a structure.
///
/// # Errors
///
/// Propagates [`FoldError`] from the sampler.
pub fn solve<S: Sampler + ?Sized>(
    model: &BuiltModel,
    sampler: &mut S,
    num_reads: usize,
) -> Result<SolutionOutcome, FoldError> {
    let outcome = match model {
        BuiltModel::Penalty(bqm) => {
            let samples = sampler.sample_penalty(bqm, num_reads)?;
            process_penalty_samples(samples)
        }
        BuiltModel::Constrained(cqm) => {
            let samples = sampler.sample_constrained(cqm)?;
            process_constrained_samples(samples, cqm)
        }
    };

    if let SolutionOutcome::Selected(solution) = &outcome {
        info!(
            "Selected {} stems ({} pseudoknots), energy {}",
            solution.num_stems(),
            solution.pseudoknots.len(),
            solution.energy
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_constrained_model, Constraint};
    use crate::stems::contained_stems;
    use crate::types::{StemGroup, StemGroups};

    fn stem(a: usize, b: usize, c: usize, d: usize) -> Stem {
        Stem::new(a, b, c, d).unwrap()
    }

    fn assignment(stems: &[(Stem, u8)]) -> Assignment {
        stems.iter().map(|&(s, v)| (Variable::Stem(s), v)).collect()
    }

    #[test]
    fn test_aggregate_merges_and_sorts() {
        let a = stem(0, 2, 10, 12);
        let b = stem(20, 22, 30, 32);
        let samples = SampleSet::new(vec![
            Sample::new(assignment(&[(a, 1), (b, 0)]), -9.0),
            Sample::new(assignment(&[(a, 1), (b, 1)]), -18.0),
            Sample::new(assignment(&[(a, 1), (b, 0)]), -9.0),
        ]);

        let aggregated = samples.aggregate();
        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated.samples[0].energy, -18.0);
        assert_eq!(aggregated.samples[1].num_occurrences, 2);
    }

    #[test]
    fn test_penalty_skips_overlapping_candidates() {
        let a = stem(0, 2, 10, 12);
        let b = stem(2, 4, 20, 22);
        let samples = SampleSet::new(vec![
            Sample::new(assignment(&[(a, 1), (b, 1)]), -18.0),
            Sample::new(assignment(&[(a, 1), (b, 0)]), -9.0),
        ]);

        let solution = process_penalty_samples(samples).into_result().unwrap();
        assert_eq!(solution.stems, vec![a]);
        assert_eq!(solution.energy, -9.0);
        assert_eq!(solution.num_variables, 2);
    }

    #[test]
    fn test_penalty_reports_pseudoknots() {
        let a = stem(0, 2, 10, 12);
        let b = stem(5, 7, 15, 17);
        let samples = SampleSet::new(vec![Sample::new(assignment(&[(a, 1), (b, 1)]), -15.3)]);

        let solution = process_penalty_samples(samples).into_result().unwrap();
        assert_eq!(solution.num_stems(), 2);
        assert_eq!(solution.pseudoknots, vec![(a, b)]);
    }

    #[test]
    fn test_empty_sample_set_is_infeasible() {
        assert_eq!(
            process_penalty_samples(SampleSet::default()),
            SolutionOutcome::AllInfeasible
        );
        assert_eq!(
            process_constrained_samples(SampleSet::default(), &ConstrainedModel::default()),
            SolutionOutcome::AllInfeasible
        );
    }

    #[test]
    fn test_all_overlapping_is_infeasible() {
        let a = stem(0, 2, 10, 12);
        let b = stem(2, 4, 20, 22);
        let samples = SampleSet::new(vec![Sample::new(assignment(&[(a, 1), (b, 1)]), -18.0)]);

        let outcome = process_penalty_samples(samples);
        assert!(outcome.solution().is_none());
        assert!(matches!(
            outcome.into_result(),
            Err(FoldError::AllCandidatesInfeasible)
        ));
    }

    #[test]
    fn test_constrained_takes_first_feasible() {
        let a = stem(0, 2, 10, 12);
        let b = stem(20, 22, 30, 32);
        let samples = SampleSet::new(vec![
            Sample::new(assignment(&[(a, 1), (b, 1)]), -18.0).with_feasibility(false),
            Sample::new(assignment(&[(a, 0), (b, 1)]), -9.0).with_feasibility(true),
            Sample::new(assignment(&[(a, 1), (b, 0)]), -9.0).with_feasibility(true),
        ]);

        let solution = process_constrained_samples(samples, &ConstrainedModel::default())
            .into_result()
            .unwrap();
        assert_eq!(solution.stems, vec![b]);
    }

    #[test]
    fn test_constrained_all_flagged_infeasible() {
        let a = stem(0, 2, 10, 12);
        let samples = SampleSet::new(vec![
            Sample::new(assignment(&[(a, 1)]), -9.0).with_feasibility(false)
        ]);
        assert_eq!(
            process_constrained_samples(samples, &ConstrainedModel::default()),
            SolutionOutcome::AllInfeasible
        );
    }

    #[test]
    fn test_constrained_unflagged_samples_checked_against_model() {
        let long = stem(0, 3, 10, 13);
        let groups = StemGroups::new(vec![StemGroup {
            maximal: long,
            substems: contained_stems(long, 3),
        }]);
        let model = build_constrained_model(&groups, 3, 0.3);
        assert!(matches!(model.constraints[0], Constraint::OneHot { .. }));

        let mut two = assignment(&[(long, 1), (stem(1, 3, 10, 12), 1)]);
        two.insert(Variable::Null(long), 0);
        let mut null = assignment(&[(long, 0)]);
        null.insert(Variable::Null(long), 1);

        let samples = SampleSet::new(vec![Sample::new(two, -25.0), Sample::new(null, 0.0)]);
        let solution = process_constrained_samples(samples, &model)
            .into_result()
            .unwrap();
        assert!(solution.stems.is_empty());
        assert_eq!(solution.num_variables, 2);
    }

    #[test]
    fn test_selected_stems_exclude_null() {
        let a = stem(0, 2, 10, 12);
        let mut values = assignment(&[(a, 1)]);
        values.insert(Variable::Null(a), 1);
        assert_eq!(Sample::new(values, 0.0).selected_stems(), vec![a]);
    }

    #[test]
    fn test_sample_set_json() {
        let json = r#"{"samples":[{"assignment":{"(0, 2, 10, 12)":1,"Null:(0, 2, 10, 12)":0},"energy":-9.0}]}"#;
        let samples: SampleSet = serde_json::from_str(json).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples.samples[0].num_occurrences, 1);
        assert!(samples.samples[0].is_feasible.is_none());
    }
}
