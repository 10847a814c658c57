use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::{
    config::ModelEncoding,
    model::Constraint,
    results::FoldingResults,
    types::{FoldError, Variable},
};

#[derive(Serialize)]
struct ModelDocument<'a> {
    header: &'a str,
    sequence: &'a str,
    encoding: &'static str,
    num_reads: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    penalty_weight: Option<f64>,
    linear: &'a BTreeMap<Variable, f64>,
    quadratic: Vec<QuadraticEntry>,
    constraints: &'a [Constraint],
}

#[derive(Serialize)]
struct QuadraticEntry {
    u: Variable,
    v: Variable,
    bias: f64,
}

/// Write the model as a pretty-printed JSON document
pub fn write_model_format<W: Write>(
    writer: &mut W,
    results: &FoldingResults,
) -> Result<(), FoldError> {
    let objective = results.model.objective();
    let document = ModelDocument {
        header: &results.sequence_info.header,
        sequence: &results.sequence,
        encoding: match results.model.encoding() {
            ModelEncoding::Penalty => "penalty",
            ModelEncoding::Constrained => "constrained",
        },
        num_reads: results.num_reads,
        penalty_weight: results.sequence_info.penalty_weight,
        linear: &objective.linear,
        quadratic: objective
            .quadratic
            .iter()
            .map(|(&(u, v), &bias)| QuadraticEntry { u, v, bias })
            .collect(),
        constraints: results.model.constraints(),
    };

    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)?;
    Ok(())
}
