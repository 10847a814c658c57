use std::io::Write;

use crate::{
    conflicts::is_pseudoknot,
    constants::BRACKET_PAIRS,
    output::selected_solution,
    results::FoldingResults,
    types::{FoldError, Stem},
};

/// Write the selected structure in dot-bracket notation
///
/// Output is a `>header` line, the sequence and the structure. Stems that
/// cross a stem already drawn move to the next bracket type.
pub fn write_dbn_format<W: Write>(
    writer: &mut W,
    results: &FoldingResults,
) -> Result<(), FoldError> {
    let solution = selected_solution(results)?;
    let structure = dot_bracket(results.sequence.len(), &solution.stems)?;

    writeln!(writer, ">{}", results.sequence_info.header)?;
    writeln!(writer, "{}", results.sequence)?;
    writeln!(writer, "{structure}")?;
    Ok(())
}

/// Render `stems` over a sequence of `length` nucleotides.
///
/// Stems are placed greedily by position, each on the first bracket level
/// where it crosses nothing.
fn dot_bracket(length: usize, stems: &[Stem]) -> Result<String, FoldError> {
    let mut ordered = stems.to_vec();
    ordered.sort();

    let mut levels: Vec<Vec<Stem>> = vec![Vec::new(); BRACKET_PAIRS.len()];
    let mut structure = vec![b'.'; length];

    for stem in ordered {
        let level = levels
            .iter()
            .position(|placed| {
                placed
                    .iter()
                    .all(|other| !is_pseudoknot(other, &stem) && !is_pseudoknot(&stem, other))
            })
            .ok_or_else(|| {
                FoldError::OutputError(format!(
                    "stem {stem} needs more than {} bracket types",
                    BRACKET_PAIRS.len()
                ))
            })?;
        levels[level].push(stem);

        let (open, close) = BRACKET_PAIRS[level];
        for (i, j) in stem.pairs() {
            if j >= length || structure[i] != b'.' || structure[j] != b'.' {
                return Err(FoldError::OutputError(format!(
                    "stem {stem} does not fit the sequence or overlaps another stem"
                )));
            }
            structure[i] = open;
            structure[j] = close;
        }
    }

    Ok(String::from_utf8_lossy(&structure).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::create_test_results;

    fn stem(a: usize, b: usize, c: usize, d: usize) -> Stem {
        Stem::new(a, b, c, d).unwrap()
    }

    #[test]
    fn test_hairpin() {
        assert_eq!(dot_bracket(9, &[stem(0, 2, 6, 8)]).unwrap(), "(((...)))");
    }

    #[test]
    fn test_nested_and_sequential() {
        let stems = [stem(10, 11, 18, 19), stem(0, 1, 7, 8), stem(2, 2, 6, 6)];
        assert_eq!(dot_bracket(20, &stems).unwrap(), "(((...))).((......))");
    }

    #[test]
    fn test_crossing_uses_square_brackets() {
        let structure = dot_bracket(18, &[stem(0, 2, 10, 12), stem(5, 7, 15, 17)]).unwrap();
        assert_eq!(structure, "(((..[[[..)))..]]]");
    }

    #[test]
    fn test_overlap_rejected() {
        assert!(matches!(
            dot_bracket(23, &[stem(0, 2, 10, 12), stem(2, 4, 20, 22)]),
            Err(FoldError::OutputError(_))
        ));
    }

    #[test]
    fn test_write_dbn_format() {
        let results = create_test_results(Some(vec![stem(0, 2, 6, 8)]));
        let mut buffer = Vec::new();
        write_dbn_format(&mut buffer, &results).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            ">toy\ngggaaacccaaaggguuu\n(((...))).........\n"
        );
    }
}
