use crate::{
    model::BuiltModel,
    solution::{FoldingSolution, SolutionOutcome},
    types::StemGroups,
};

/// Folding results for one sequence.
///
/// Holds the enumerated stems, the model built from them and, once a
/// sample set has been processed, the selected structure.
///
/// # Examples
///
/// ```rust
/// use stemfold_core::{FoldingAnalyzer, config::FoldingConfig};
///
/// let analyzer = FoldingAnalyzer::new(FoldingConfig::default());
/// let results = analyzer.analyze_sequence("gggaaacccaaaggguuu", None)?;
///
/// println!("Sequence: {}", results.sequence_info.header);
/// println!("Candidate stems: {}", results.sequence_info.num_candidate_stems);
/// println!("Variables: {}", results.model.num_variables());
/// assert!(results.solution.is_none());
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FoldingResults {
    /// Normalized (lowercase) sequence.
    pub sequence: String,

    /// Maximal stems and their contained stems, in discovery order.
    pub groups: StemGroups,

    /// Model in the configured encoding.
    pub model: BuiltModel,

    /// Number of reads requested from the solver.
    pub num_reads: usize,

    /// Selection from a processed sample set, if one was supplied.
    pub solution: Option<SolutionOutcome>,

    /// Information about the analyzed sequence.
    pub sequence_info: SequenceInfo,
}

impl FoldingResults {
    /// The selected structure, if a sample set produced one.
    #[must_use]
    pub fn selected(&self) -> Option<&FoldingSolution> {
        self.solution.as_ref().and_then(SolutionOutcome::solution)
    }
}

/// Information about a processed sequence.
///
/// # Examples
///
/// ```rust
/// # use stemfold_core::results::SequenceInfo;
/// let info = SequenceInfo {
///     length: 18,
///     gc_content: 0.5,
///     num_maximal_stems: 2,
///     num_candidate_stems: 5,
///     num_variables: 5,
///     num_interactions: 7,
///     num_constraints: 0,
///     penalty_weight: Some(19.0),
///     header: "hairpin".to_string(),
///     description: None,
/// };
///
/// println!("{}: {} nt, {:.2}% GC, {} stems",
///          info.header,
///          info.length,
///          info.gc_content * 100.0,
///          info.num_candidate_stems);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceInfo {
    /// Length of the sequence in nucleotides.
    pub length: usize,

    /// GC content as a fraction (0.0 to 1.0).
    pub gc_content: f64,

    /// Number of maximal stems.
    pub num_maximal_stems: usize,

    /// Number of candidate stems across all groups.
    pub num_candidate_stems: usize,

    /// Number of model variables, null variables included.
    pub num_variables: usize,

    /// Number of quadratic terms in the objective.
    pub num_interactions: usize,

    /// Number of constraints (zero for the penalty encoding).
    pub num_constraints: usize,

    /// Overlap penalty used by the penalty encoding.
    pub penalty_weight: Option<f64>,

    /// Sequence identifier.
    ///
    /// The FASTA record id, or the file stem for labeled text.
    pub header: String,

    /// Sequence description from the FASTA header.
    pub description: Option<String>,
}
