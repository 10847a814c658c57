use std::io::Write;

use crate::{results::FoldingResults, types::FoldError};

/// Write stems as tab-separated `a b c d length` lines (0-based)
///
/// Lists the selected stems when a structure was selected, every candidate
/// stem otherwise.
pub fn write_stems_format<W: Write>(
    writer: &mut W,
    results: &FoldingResults,
) -> Result<(), FoldError> {
    let stems: Vec<_> = match results.selected() {
        Some(solution) => solution.stems.clone(),
        None => results.groups.all_stems().collect(),
    };

    for stem in stems {
        let (a, b, c, d) = stem.as_tuple();
        writeln!(writer, "{a}\t{b}\t{c}\t{d}\t{}", stem.length())?;
    }
    Ok(())
}
