use crate::{
    constants::{
        DEFAULT_MIN_LOOP, DEFAULT_MIN_STEM, DEFAULT_NUM_READS, DEFAULT_PSEUDOKNOT_COEFFICIENT,
    },
    types::FoldError,
};

/// Output format options for folding results.
///
/// # Formats
///
/// - **Model**: JSON document handed to an external solver
/// - **Stems**: Tab-separated stem 4-tuples
/// - **DotBracket**: Dot-bracket string of a selected structure
/// - **Edges**: Backbone and base-pair edge list for graph rendering
///
/// # Examples
///
/// ```rust
/// use stemfold_core::config::{FoldingConfig, OutputFormat};
///
/// let config = FoldingConfig {
///     output_format: OutputFormat::Stems,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON model document (linear terms, quadratic terms and constraints).
    Model,

    /// One stem per line: `a b c d length`, 0-based and tab-separated.
    ///
    /// Lists the selected stems when a solution is present, every candidate
    /// stem otherwise.
    Stems,

    /// Dot-bracket notation of the selected structure.
    ///
    /// Crossing stems are written with `[]`, `{}` and `<>`.
    DotBracket,

    /// Edge list of the folded graph: backbone links and base pairs.
    Edges,
}

/// How stem selection is encoded for the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelEncoding {
    /// Unconstrained binary quadratic model; structural conflicts become
    /// large quadratic penalties.
    #[default]
    Penalty,

    /// Constrained model; structural conflicts become one-hot and pairwise
    /// inequality constraints.
    Constrained,
}

/// Configuration settings for stem enumeration and model construction.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use stemfold_core::config::FoldingConfig;
///
/// let config = FoldingConfig::default();
/// assert_eq!(config.min_stem, 3);
/// ```
///
/// ## Constrained encoding with longer stems
///
/// ```rust
/// use stemfold_core::config::{FoldingConfig, ModelEncoding};
///
/// let config = FoldingConfig {
///     min_stem: 4,
///     encoding: ModelEncoding::Constrained,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct FoldingConfig {
    /// Minimum number of consecutive base pairs in a stem.
    ///
    /// **Default**: `3`
    pub min_stem: usize,

    /// Minimum index distance a pair must exceed to be bondable.
    ///
    /// A hairpin needs some unpaired nucleotides; pairs with `j - i <= min_loop`
    /// never enter the bond matrix.
    ///
    /// **Default**: `2`
    pub min_loop: usize,

    /// Scale `c` of the pseudoknot penalty `c * len(s1) * len(s2)`.
    ///
    /// **Default**: `0.3`
    pub pseudoknot_coefficient: f64,

    /// Quadratic weight applied to overlapping stems in the penalty encoding.
    ///
    /// `None` derives it from the data as `(longest stem)^2 + 3`.
    ///
    /// **Default**: `None`
    pub penalty_weight: Option<f64>,

    /// Penalty or constrained encoding.
    ///
    /// **Default**: [`ModelEncoding::Penalty`]
    pub encoding: ModelEncoding,

    /// Number of reads requested from an unconstrained sampler.
    ///
    /// **Default**: `20`
    pub num_reads: usize,

    /// Output format used by the command-line front end.
    ///
    /// **Default**: [`OutputFormat::Model`]
    pub output_format: OutputFormat,

    /// Number of threads for the conflict searches.
    ///
    /// When set, configures the global Rayon pool. `None` uses all cores.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,

    /// Suppress informational log output.
    ///
    /// **Default**: `false`
    pub quiet: bool,
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            min_stem: DEFAULT_MIN_STEM,
            min_loop: DEFAULT_MIN_LOOP,
            pseudoknot_coefficient: DEFAULT_PSEUDOKNOT_COEFFICIENT,
            penalty_weight: None,
            encoding: ModelEncoding::Penalty,
            num_reads: DEFAULT_NUM_READS,
            output_format: OutputFormat::Model,
            num_threads: None,
            quiet: false,
        }
    }
}

impl FoldingConfig {
    /// Check parameters before any enumeration work starts.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidConfig`] when the minimum stem length or
    /// sample count is zero, the stem and loop lengths are too large to
    /// index a sequence, a coefficient is negative or not finite, or the
    /// thread count is zero.
    pub fn validate(&self) -> Result<(), FoldError> {
        if self.min_stem == 0 {
            return Err(FoldError::InvalidConfig(
                "minimum stem length must be at least 1".to_string(),
            ));
        }
        // Shortest hairpin span; enumeration indexes with it
        if self
            .min_stem
            .checked_mul(2)
            .and_then(|arms| arms.checked_add(self.min_loop))
            .is_none()
        {
            return Err(FoldError::InvalidConfig(format!(
                "minimum stem length {} and loop length {} are too large",
                self.min_stem, self.min_loop
            )));
        }
        if !self.pseudoknot_coefficient.is_finite() || self.pseudoknot_coefficient < 0.0 {
            return Err(FoldError::InvalidConfig(format!(
                "pseudoknot coefficient must be a non-negative number, got {}",
                self.pseudoknot_coefficient
            )));
        }
        if let Some(weight) = self.penalty_weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(FoldError::InvalidConfig(format!(
                    "penalty weight must be a positive number, got {weight}"
                )));
            }
        }
        if self.num_reads == 0 {
            return Err(FoldError::InvalidConfig(
                "number of reads must be at least 1".to_string(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(FoldError::InvalidConfig(
                "number of threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FoldingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_stem, 3);
        assert_eq!(config.min_loop, 2);
        assert_eq!(config.encoding, ModelEncoding::Penalty);
        assert!(config.penalty_weight.is_none());
    }

    #[test]
    fn test_zero_min_stem_rejected() {
        let config = FoldingConfig {
            min_stem: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FoldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_coefficients_rejected() {
        let negative = FoldingConfig {
            pseudoknot_coefficient: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan_weight = FoldingConfig {
            penalty_weight: Some(f64::NAN),
            ..Default::default()
        };
        assert!(nan_weight.validate().is_err());

        let zero_weight = FoldingConfig {
            penalty_weight: Some(0.0),
            ..Default::default()
        };
        assert!(zero_weight.validate().is_err());
    }

    #[test]
    fn test_zero_reads_and_threads_rejected() {
        let reads = FoldingConfig {
            num_reads: 0,
            ..Default::default()
        };
        assert!(reads.validate().is_err());

        let threads = FoldingConfig {
            num_threads: Some(0),
            ..Default::default()
        };
        assert!(threads.validate().is_err());
    }

    #[test]
    fn test_oversized_lengths_rejected() {
        let stem = FoldingConfig {
            min_stem: usize::MAX / 2 + 1,
            ..Default::default()
        };
        assert!(matches!(stem.validate(), Err(FoldError::InvalidConfig(_))));

        let stem_and_loop = FoldingConfig {
            min_stem: usize::MAX / 2,
            min_loop: 2,
            ..Default::default()
        };
        assert!(stem_and_loop.validate().is_err());

        let huge_loop = FoldingConfig {
            min_loop: usize::MAX,
            ..Default::default()
        };
        assert!(huge_loop.validate().is_err());
    }

    #[test]
    fn test_zero_min_loop_allowed() {
        let config = FoldingConfig {
            min_loop: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
