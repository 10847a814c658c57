use std::marker::PhantomData;
use std::path::Path;

use log::{debug, info};

use crate::config::{FoldingConfig, ModelEncoding};
use crate::model::{
    build_constrained_model, build_penalty_model, default_penalty_weight, BuiltModel,
};
use crate::results::{FoldingResults, SequenceInfo};
use crate::sequence::encoded::EncodedSequence;
use crate::sequence::{read_fasta_sequence, read_labeled_sequence};
use crate::solution::{solve, Sampler, SolutionOutcome};
use crate::stems::enumerate_stems;
use crate::types::{FoldError, StemGroups};

/// Marker trait for the enumeration state of a [`StemFolder`].
pub trait EnumerationState {}

/// Marker type: no stems have been enumerated yet.
#[derive(Debug, Clone)]
pub struct Unenumerated;

/// Marker type: stems are enumerated and the overlap penalty is fixed.
#[derive(Debug, Clone)]
pub struct Enumerated;

impl EnumerationState for Unenumerated {}
impl EnumerationState for Enumerated {}

/// Stem-selection pipeline with a type-state for enumeration.
///
/// Models can only be built once stems are enumerated; the transition
/// happens in [`StemFolder::enumerate`], which also settles the overlap
/// penalty from the enumerated stems.
///
/// # Examples
///
/// ```rust
/// use stemfold_core::engine::UnenumeratedFolder;
/// use stemfold_core::sequence::encoded::EncodedSequence;
///
/// let folder = UnenumeratedFolder::new();
/// let encoded = EncodedSequence::new(b"gggaaacccaaaggguuu", 2)?;
///
/// let folder = folder.enumerate(&encoded)?;
/// let model = folder.build_model();
/// assert_eq!(model.num_variables(), folder.groups().stem_count());
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[derive(Debug)]
pub struct StemFolder<S: EnumerationState> {
    /// Enumeration and model parameters
    pub config: FoldingConfig,
    groups: StemGroups,
    penalty_weight: f64,
    _state: PhantomData<S>,
}

pub type UnenumeratedFolder = StemFolder<Unenumerated>;

pub type EnumeratedFolder = StemFolder<Enumerated>;

impl Default for UnenumeratedFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnenumeratedFolder {
    /// Folder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FoldingConfig::default(),
            groups: StemGroups::default(),
            penalty_weight: 0.0,
            _state: PhantomData,
        }
    }

    /// Folder with a custom configuration.
    ///
    /// When `num_threads` is set the global Rayon pool is configured. A pool
    /// that is already running is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidConfig`] if the configuration does not
    /// validate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stemfold_core::engine::UnenumeratedFolder;
    /// use stemfold_core::config::{FoldingConfig, ModelEncoding};
    ///
    /// let config = FoldingConfig {
    ///     min_stem: 4,
    ///     encoding: ModelEncoding::Constrained,
    ///     ..Default::default()
    /// };
    ///
    /// let folder = UnenumeratedFolder::with_config(config)?;
    /// # Ok::<(), stemfold_core::types::FoldError>(())
    /// ```
    pub fn with_config(config: FoldingConfig) -> Result<Self, FoldError> {
        config.validate()?;

        if let Some(num_threads) = config.num_threads {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
            {
                debug!("Keeping existing thread pool: {e}");
            }
        }

        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Enumerate stem groups and fix the overlap penalty.
    ///
    /// The penalty is the configured override, or `(longest stem)^2 + 3`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidConfig`] if `encoded` was built with a
    /// different minimum loop length than the configuration.
    pub fn enumerate(self, encoded: &EncodedSequence) -> Result<EnumeratedFolder, FoldError> {
        if encoded.bonds.min_loop() != self.config.min_loop {
            return Err(FoldError::InvalidConfig(format!(
                "sequence encoded with minimum loop {}, configuration expects {}",
                encoded.bonds.min_loop(),
                self.config.min_loop
            )));
        }

        let groups = enumerate_stems(&encoded.bonds, self.config.min_stem, self.config.min_loop);
        let penalty_weight = self
            .config
            .penalty_weight
            .unwrap_or_else(|| default_penalty_weight(&groups));

        if !self.config.quiet {
            info!(
                "Found {} maximal stems, {} candidate stems",
                groups.len(),
                groups.stem_count()
            );
        }

        Ok(StemFolder {
            config: self.config,
            groups,
            penalty_weight,
            _state: PhantomData,
        })
    }
}

impl EnumeratedFolder {
    #[must_use]
    pub const fn groups(&self) -> &StemGroups {
        &self.groups
    }

    /// Overlap penalty of the penalty encoding.
    #[must_use]
    pub const fn penalty_weight(&self) -> f64 {
        self.penalty_weight
    }

    #[must_use]
    pub fn into_groups(self) -> StemGroups {
        self.groups
    }

    /// Build the model in the configured encoding.
    #[must_use]
    pub fn build_model(&self) -> BuiltModel {
        let config = &self.config;
        match config.encoding {
            ModelEncoding::Penalty => BuiltModel::Penalty(build_penalty_model(
                &self.groups,
                config.min_stem,
                config.pseudoknot_coefficient,
                self.penalty_weight,
            )),
            ModelEncoding::Constrained => BuiltModel::Constrained(build_constrained_model(
                &self.groups,
                config.min_stem,
                config.pseudoknot_coefficient,
            )),
        }
    }

    /// Sample `model` and select a structure.
    ///
    /// # Errors
    ///
    /// Propagates sampler failures.
    pub fn fold_with<S: Sampler + ?Sized>(
        &self,
        model: &BuiltModel,
        sampler: &mut S,
    ) -> Result<SolutionOutcome, FoldError> {
        solve(model, sampler, self.config.num_reads)
    }
}

/// High-level entry point: encode, enumerate and build in one call.
///
/// # Examples
///
/// ## Build a model for a sequence
///
/// ```rust
/// use stemfold_core::{FoldingAnalyzer, config::FoldingConfig};
///
/// let analyzer = FoldingAnalyzer::new(FoldingConfig::default());
/// let results = analyzer.analyze_sequence("gggaaacccaaaggguuu", Some("toy".to_string()))?;
///
/// assert_eq!(results.sequence_info.header, "toy");
/// assert!(results.sequence_info.num_candidate_stems > 0);
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
///
/// ## Select a structure from recorded samples
///
/// ```rust,no_run
/// use stemfold_core::{FoldingAnalyzer, config::FoldingConfig};
/// use stemfold_core::solution::RecordedSampler;
///
/// let analyzer = FoldingAnalyzer::new(FoldingConfig::default());
/// let mut results = analyzer.analyze_file("sequence.txt")?;
///
/// let mut sampler = RecordedSampler::from_path("samples.json")?;
/// analyzer.resolve(&mut results, &mut sampler)?;
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FoldingAnalyzer {
    /// Enumeration and model parameters
    pub config: FoldingConfig,
}

impl FoldingAnalyzer {
    #[must_use]
    pub const fn new(config: FoldingConfig) -> Self {
        Self { config }
    }

    /// Analyze a labeled-text sequence file.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError`] if the file cannot be read or the sequence is
    /// malformed.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<FoldingResults, FoldError> {
        let (header, description, sequence) = read_labeled_sequence(path)?;
        self.analyze_sequence_bytes(&sequence, header, description)
    }

    /// Analyze the first record of a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError`] if the file cannot be read, has no records, or
    /// the sequence is malformed.
    pub fn analyze_fasta_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<FoldingResults, FoldError> {
        let (header, description, sequence) = read_fasta_sequence(path)?;
        self.analyze_sequence_bytes(&sequence, header, description)
    }

    /// Analyze a raw sequence string.
    ///
    /// The header defaults to `Stemfold_Seq_1`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::MalformedInput`] for empty input or unknown
    /// symbols, and [`FoldError::InvalidConfig`] for a bad configuration.
    pub fn analyze_sequence(
        &self,
        sequence: &str,
        header: Option<String>,
    ) -> Result<FoldingResults, FoldError> {
        let header = header.unwrap_or_else(|| "Stemfold_Seq_1".to_string());
        self.analyze_sequence_bytes(sequence.as_bytes(), header, None)
    }

    /// Encode, enumerate and build the model for raw sequence bytes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FoldingAnalyzer::analyze_sequence`].
    pub fn analyze_sequence_bytes(
        &self,
        sequence: &[u8],
        header: String,
        description: Option<String>,
    ) -> Result<FoldingResults, FoldError> {
        let folder = UnenumeratedFolder::with_config(self.config.clone())?;
        let encoded = EncodedSequence::new(sequence, self.config.min_loop)?;
        if !self.config.quiet {
            info!("Analyzing {header} ({} nt)", encoded.sequence_length);
        }

        let folder = folder.enumerate(&encoded)?;
        let model = folder.build_model();

        let sequence_info = SequenceInfo {
            length: encoded.sequence_length,
            gc_content: encoded.gc_content,
            num_maximal_stems: folder.groups().len(),
            num_candidate_stems: folder.groups().stem_count(),
            num_variables: model.num_variables(),
            num_interactions: model.objective().num_interactions(),
            num_constraints: model.constraints().len(),
            penalty_weight: match model {
                BuiltModel::Penalty(_) => Some(folder.penalty_weight()),
                BuiltModel::Constrained(_) => None,
            },
            header,
            description,
        };

        Ok(FoldingResults {
            sequence: encoded.as_str().to_string(),
            groups: folder.into_groups(),
            model,
            num_reads: self.config.num_reads,
            solution: None,
            sequence_info,
        })
    }

    /// Sample the model in `results` and store the selection.
    ///
    /// # Errors
    ///
    /// Propagates sampler failures. An infeasible outcome is stored, not
    /// returned as an error.
    pub fn resolve<S: Sampler + ?Sized>(
        &self,
        results: &mut FoldingResults,
        sampler: &mut S,
    ) -> Result<(), FoldError> {
        let outcome = solve(&results.model, sampler, results.num_reads)?;
        results.solution = Some(outcome);
        Ok(())
    }
}
