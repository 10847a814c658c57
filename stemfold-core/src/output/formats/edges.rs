use std::io::Write;

use crate::{output::selected_solution, results::FoldingResults, types::FoldError};

/// Write the folded graph as `source target kind` lines
///
/// Backbone edges link consecutive nucleotides; pair edges come from the
/// selected stems.
pub fn write_edges_format<W: Write>(
    writer: &mut W,
    results: &FoldingResults,
) -> Result<(), FoldError> {
    let solution = selected_solution(results)?;

    writeln!(writer, "# {}\t{}", results.sequence_info.header, results.sequence)?;
    for i in 1..results.sequence.len() {
        writeln!(writer, "{}\t{}\tbackbone", i - 1, i)?;
    }
    for stem in &solution.stems {
        for (i, j) in stem.pairs() {
            writeln!(writer, "{i}\t{j}\tpair")?;
        }
    }
    Ok(())
}
