//! # Stemfold - RNA Stem Selection Models
//!
//! Builds the optimization models used to predict RNA secondary structure
//! (pseudoknots included) as a stem-selection problem for an external
//! quadratic solver, and turns the solver's samples back into a structure.
//!
//! ## Overview
//!
//! A stem is a run of consecutive antiparallel base pairs. The pipeline
//! enumerates every candidate stem of a sequence, detects the pairs of stems
//! that cannot coexist (shared nucleotides) or that cross (pseudoknots), and
//! encodes the choice of stems as a binary optimization problem:
//!
//! 1. **Encoding**: validate the sequence and compute which index pairs can bond
//! 2. **Enumeration**: find maximal stems and every stem contained in them
//! 3. **Conflicts**: overlapping pairs and crossing pairs, searched in parallel
//! 4. **Model**: penalty (quadratic) or constrained encoding
//! 5. **Selection**: pick the best acceptable candidate from a sample set
//!
//! ## Quick Start
//!
//! ```rust
//! use stemfold_core::{FoldingAnalyzer, config::FoldingConfig};
//!
//! let analyzer = FoldingAnalyzer::new(FoldingConfig::default());
//! let results = analyzer.analyze_sequence("gggaaacccaaaggguuu", Some("toy".to_string()))?;
//!
//! println!(
//!     "{} candidate stems, {} model variables",
//!     results.sequence_info.num_candidate_stems,
//!     results.model.num_variables()
//! );
//! # Ok::<(), stemfold_core::types::FoldError>(())
//! ```
//!
//! ## Architecture
//!
//! The library uses a type-state pattern so that models are only built from
//! enumerated stems:
//!
//! ```rust
//! use stemfold_core::engine::UnenumeratedFolder;
//! use stemfold_core::config::FoldingConfig;
//! use stemfold_core::sequence::encoded::EncodedSequence;
//!
//! let folder = UnenumeratedFolder::with_config(FoldingConfig::default())?;
//! let encoded = EncodedSequence::new(b"gggaaacccaaaggguuu", 2)?;
//!
//! // Enumeration changes the type to EnumeratedFolder
//! let folder = folder.enumerate(&encoded)?;
//! let model = folder.build_model();
//! println!("overlap penalty {}", folder.penalty_weight());
//! # Ok::<(), stemfold_core::types::FoldError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration options
//! - [`engine`]: Type-state pipeline and the high-level analyzer
//! - [`types`]: Stems, variables, stem groups and errors
//! - [`results`]: Folding results
//! - [`sequence`]: Sequence validation, bond matrix and input readers
//! - [`stems`]: Maximal and contained stem enumeration
//! - [`conflicts`]: Overlap and pseudoknot detection
//! - [`model`]: Penalty and constrained model construction
//! - [`solution`]: Sample-set processing and the solver interface
//! - [`output`]: Output formatting
//! - [`bitmap`]: Packed upper-triangular bit matrix
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, FoldError>`](types::FoldError),
//! covering:
//!
//! - Malformed sequences (empty, unknown symbols)
//! - Invalid configuration
//! - Solver and sample-set errors
//! - I/O and JSON errors

pub mod bitmap;
pub mod config;
pub mod conflicts;
pub mod constants;
pub mod engine;
pub mod model;
pub mod output;
pub mod results;
pub mod sequence;
pub mod solution;
pub mod stems;
pub mod types;

pub use engine::FoldingAnalyzer;
pub use results::FoldingResults;
pub use types::FoldError;
