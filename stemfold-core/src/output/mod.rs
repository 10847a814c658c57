//! Output formatting for folding results.
//!
//! This module provides writers for converting [`FoldingResults`] into the
//! documents consumed by an external solver or a visualization step.
//!
//! ## Supported Formats
//!
//! - **Model**: JSON model document for the solver
//! - **Stems**: Tab-separated stem 4-tuples
//! - **DotBracket**: Sequence and structure in dot-bracket notation
//! - **Edges**: Backbone and base-pair edges of the folded graph
//!
//! Dot-bracket and edge output describe a selected structure and need a
//! processed sample set.
//!
//! ## Examples
//!
//! ```rust
//! use stemfold_core::{FoldingAnalyzer, config::{FoldingConfig, OutputFormat}};
//! use stemfold_core::output::write_results;
//!
//! let analyzer = FoldingAnalyzer::new(FoldingConfig::default());
//! let results = analyzer.analyze_sequence("gggaaacccaaaggguuu", None)?;
//!
//! let mut buffer = Vec::new();
//! write_results(&mut buffer, &results, OutputFormat::Stems)?;
//! assert!(!buffer.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{
    config::OutputFormat, results::FoldingResults, solution::FoldingSolution, types::FoldError,
};
use std::io::Write;

mod formats {
    pub mod dbn;
    pub mod edges;
    pub mod model;
    pub mod stems;
}

use formats::{
    dbn::write_dbn_format, edges::write_edges_format, model::write_model_format,
    stems::write_stems_format,
};

/// Writes folding results in the specified format.
///
/// # Errors
///
/// Returns [`FoldError`] if writing fails, or [`FoldError::OutputError`]
/// when the format needs a selected structure that the results lack.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &FoldingResults,
    format: OutputFormat,
) -> Result<(), FoldError> {
    match format {
        OutputFormat::Model => write_model_format(writer, results),
        OutputFormat::Stems => write_stems_format(writer, results),
        OutputFormat::DotBracket => write_dbn_format(writer, results),
        OutputFormat::Edges => write_edges_format(writer, results),
    }
}

/// Parse a format name as given on the command line.
///
/// # Errors
///
/// Returns [`FoldError::InvalidConfig`] for unknown names.
pub fn parse_output_format(name: &str) -> Result<OutputFormat, FoldError> {
    match name {
        "model" | "json" => Ok(OutputFormat::Model),
        "stems" | "tsv" => Ok(OutputFormat::Stems),
        "dbn" | "dot-bracket" => Ok(OutputFormat::DotBracket),
        "edges" => Ok(OutputFormat::Edges),
        other => Err(FoldError::InvalidConfig(format!(
            "unknown output format '{other}'"
        ))),
    }
}

fn selected_solution(results: &FoldingResults) -> Result<&FoldingSolution, FoldError> {
    results.selected().ok_or_else(|| {
        FoldError::OutputError("this format needs a selected structure; supply samples".to_string())
    })
}
