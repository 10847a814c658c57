use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::{
    model::{ConstrainedModel, QuadraticModel},
    solution::SampleSet,
    types::FoldError,
};

/// An external solver.
///
/// Each call is a single blocking request; timeouts and retries belong to
/// the implementation.
pub trait Sampler {
    /// Sample an unconstrained model, asking for `num_reads` candidates.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::SolverError`] when the solver fails.
    fn sample_penalty(
        &mut self,
        model: &QuadraticModel,
        num_reads: usize,
    ) -> Result<SampleSet, FoldError>;

    /// Sample a constrained model; candidates should carry a feasibility flag.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::SolverError`] when the solver fails.
    fn sample_constrained(&mut self, model: &ConstrainedModel) -> Result<SampleSet, FoldError>;
}

/// Replays a sample set written by a solver that ran elsewhere.
///
/// The recorded samples must only use variables of the model they are
/// replayed against.
///
/// # Examples
///
/// ```rust
/// use stemfold_core::solution::{RecordedSampler, Sampler};
/// use stemfold_core::model::QuadraticModel;
///
/// let mut sampler = RecordedSampler::from_reader(r#"{"samples": []}"#.as_bytes())?;
/// let samples = sampler.sample_penalty(&QuadraticModel::default(), 20)?;
/// assert!(samples.is_empty());
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordedSampler {
    samples: SampleSet,
}

impl RecordedSampler {
    #[must_use]
    pub const fn new(samples: SampleSet) -> Self {
        Self { samples }
    }

    /// Read a JSON sample-set document.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::SerializationError`] for malformed JSON or
    /// unknown variable labels.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FoldError> {
        let samples: SampleSet = serde_json::from_reader(reader)?;
        Ok(Self::new(samples))
    }

    /// Read a JSON sample-set document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::IoError`] when the file cannot be opened, or
    /// the errors of [`RecordedSampler::from_reader`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FoldError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn replay(&self, model: &QuadraticModel) -> Result<SampleSet, FoldError> {
        let unknown = self
            .samples
            .iter()
            .flat_map(|sample| sample.assignment.keys())
            .find(|variable| !model.contains(variable));

        if let Some(variable) = unknown {
            return Err(FoldError::SolverError(format!(
                "sample references variable {variable} that is not in the model"
            )));
        }

        debug!("Replaying {} recorded samples", self.samples.len());
        Ok(self.samples.clone())
    }
}

impl Sampler for RecordedSampler {
    fn sample_penalty(
        &mut self,
        model: &QuadraticModel,
        _num_reads: usize,
    ) -> Result<SampleSet, FoldError> {
        self.replay(model)
    }

    fn sample_constrained(&mut self, model: &ConstrainedModel) -> Result<SampleSet, FoldError> {
        self.replay(&model.objective)
    }
}
