//! Nucleotide sequences and the bond-possibility matrix.
//!
//! ## Overview
//!
//! Sequences are kept as lowercase ASCII bytes over `a`, `c`, `g`, `u` and
//! `t` (an alias of `u` recorded by DNA-oriented databases). Two bases may
//! hydrogen-bond when they form one of the pairs in
//! [`HYDROGEN_BONDS`](crate::constants::HYDROGEN_BONDS), in either orientation.
//!
//! ## Modules
//!
//! - [`encoded`]: Validated sequence together with its bond matrix
//! - [`io`]: Labeled-text and FASTA readers
//!
//! ## Examples
//!
//! ```rust
//! use stemfold_core::sequence::{can_pair, normalize_sequence};
//!
//! let seq = normalize_sequence(b"GGGaaaCCC")?;
//! assert_eq!(seq, b"gggaaaccc");
//! assert!(can_pair(b'g', b'c'));
//! assert!(can_pair(b'u', b'g'));
//! assert!(!can_pair(b'a', b'c'));
//! # Ok::<(), stemfold_core::types::FoldError>(())
//! ```

use bio::alphabets::Alphabet;

use crate::constants::{HYDROGEN_BONDS, NUCLEOTIDE_SYMBOLS};
use crate::types::FoldError;

pub mod encoded;
pub mod io;

pub use io::*;

/// Whether bases `x` and `y` (lowercase) can hydrogen-bond.
#[must_use]
pub fn can_pair(x: u8, y: u8) -> bool {
    HYDROGEN_BONDS
        .iter()
        .any(|&(p, q)| (x == p && y == q) || (x == q && y == p))
}

/// Lowercase a raw sequence and check it only contains nucleotide symbols.
///
/// # Errors
///
/// Returns [`FoldError::MalformedInput`] for an empty sequence or for the
/// first symbol outside `a`, `c`, `g`, `t`, `u` (case-insensitive).
pub fn normalize_sequence(raw: &[u8]) -> Result<Vec<u8>, FoldError> {
    if raw.is_empty() {
        return Err(FoldError::MalformedInput("empty sequence".to_string()));
    }

    let sequence = raw.to_ascii_lowercase();
    let alphabet = Alphabet::new(NUCLEOTIDE_SYMBOLS);
    if !alphabet.is_word(&sequence) {
        let (position, symbol) = sequence
            .iter()
            .enumerate()
            .find(|(_, symbol)| !NUCLEOTIDE_SYMBOLS.contains(*symbol))
            .map_or((0, '?'), |(position, &symbol)| (position, symbol as char));
        return Err(FoldError::MalformedInput(format!(
            "unrecognized nucleotide '{symbol}' at position {position}"
        )));
    }

    Ok(sequence)
}

/// Fraction of `g` and `c` bases; `0.0` for an empty sequence.
#[must_use]
pub fn gc_content(sequence: &[u8]) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let gc = sequence
        .iter()
        .filter(|&&base| base == b'g' || base == b'c')
        .count();
    gc as f64 / sequence.len() as f64
}
