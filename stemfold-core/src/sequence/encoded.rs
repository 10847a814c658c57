use crate::{
    bitmap::BitMatrix,
    sequence::{can_pair, gc_content, normalize_sequence, parse_labeled_text},
    types::FoldError,
};

/// Read-only relation of index pairs that can form a base pair.
///
/// Cell `(i, j)`, `i < j`, is set iff the bases at `i` and `j` can
/// hydrogen-bond and `j - i` exceeds the minimum loop length. Nothing below
/// the diagonal is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondMatrix {
    cells: BitMatrix,
    min_loop: usize,
}

impl BondMatrix {
    /// Build the relation for an already normalized sequence.
    #[must_use]
    pub fn from_sequence(sequence: &[u8], min_loop: usize) -> Self {
        let n = sequence.len();
        let mut cells = BitMatrix::new(n);

        for i in 0..n {
            for j in i.saturating_add(min_loop).saturating_add(1)..n {
                if can_pair(sequence[i], sequence[j]) {
                    cells.set(i, j);
                }
            }
        }

        Self { cells, min_loop }
    }

    /// Whether `(i, j)` can pair. Always `false` unless `i < j < n`.
    #[must_use]
    pub fn is_bondable(&self, i: usize, j: usize) -> bool {
        self.cells.get(i, j)
    }

    /// Sequence length the matrix was built for.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.cells.size()
    }

    #[must_use]
    pub const fn min_loop(&self) -> usize {
        self.min_loop
    }

    /// Number of bondable pairs.
    #[must_use]
    pub fn bond_count(&self) -> usize {
        self.cells.count_ones()
    }
}

/// A validated nucleotide sequence together with its bond matrix.
#[derive(Debug, Clone)]
pub struct EncodedSequence {
    pub sequence: Vec<u8>,
    pub bonds: BondMatrix,
    pub gc_content: f64,
    pub sequence_length: usize,
}

impl EncodedSequence {
    /// Encode a raw sequence (case-insensitive, no labels or whitespace).
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::MalformedInput`] for empty input or symbols
    /// outside `a`, `c`, `g`, `t`, `u`.
    pub fn new(raw: &[u8], min_loop: usize) -> Result<Self, FoldError> {
        let sequence = normalize_sequence(raw)?;
        let bonds = BondMatrix::from_sequence(&sequence, min_loop);

        Ok(Self {
            gc_content: gc_content(&sequence),
            sequence_length: sequence.len(),
            sequence,
            bonds,
        })
    }

    /// Encode labeled text where each line starts with a token to skip.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EncodedSequence::new`].
    pub fn from_labeled_text(text: &str, min_loop: usize) -> Result<Self, FoldError> {
        Self::new(parse_labeled_text(text).as_bytes(), min_loop)
    }

    /// The sequence as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // normalize_sequence only admits ASCII letters
        std::str::from_utf8(&self.sequence).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_matrix_respects_min_loop() {
        // g at 0 pairs with c at 3 (distance 3 > 2) but not with c at 2
        let encoded = EncodedSequence::new(b"gacc", 2).unwrap();
        assert!(encoded.bonds.is_bondable(0, 3));
        assert!(!encoded.bonds.is_bondable(0, 2));
        assert_eq!(encoded.bonds.bond_count(), 1);
    }

    #[test]
    fn test_bond_matrix_upper_triangle() {
        let encoded = EncodedSequence::new(b"gaaac", 2).unwrap();
        assert!(encoded.bonds.is_bondable(0, 4));
        assert!(!encoded.bonds.is_bondable(4, 0));
    }

    #[test]
    fn test_every_bond_is_a_valid_pair() {
        let seq = b"gggaaacccaaaggguuu";
        let encoded = EncodedSequence::new(seq, 2).unwrap();
        let n = encoded.sequence_length;

        for i in 0..n {
            for j in 0..n {
                let expected = i < j && j - i > 2 && can_pair(seq[i], seq[j]);
                assert_eq!(encoded.bonds.is_bondable(i, j), expected, "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_t_is_alias_of_u() {
        let with_t = EncodedSequence::new(b"gaaaataaaac", 2).unwrap();
        let with_u = EncodedSequence::new(b"gaaaauaaaac", 2).unwrap();
        assert_eq!(with_t.bonds, with_u.bonds);
    }

    #[test]
    fn test_labeled_text() {
        let text = "1 GGGAAA CCC\n2 aaaggg uuu\n";
        let encoded = EncodedSequence::from_labeled_text(text, 2).unwrap();
        assert_eq!(encoded.as_str(), "gggaaacccaaaggguuu");
        assert_eq!(encoded.sequence_length, 18);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            EncodedSequence::new(b"acgx", 2),
            Err(FoldError::MalformedInput(_))
        ));
        assert!(matches!(
            EncodedSequence::from_labeled_text("label_only\n", 2),
            Err(FoldError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_huge_min_loop_has_no_bonds() {
        let encoded = EncodedSequence::new(b"gggaaaccc", usize::MAX).unwrap();
        assert_eq!(encoded.bonds.bond_count(), 0);
        assert_eq!(encoded.bonds.min_loop(), usize::MAX);
    }
}
