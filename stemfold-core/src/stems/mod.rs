//! Stem enumeration over the bond matrix.
//!
//! Maximal stems are found with a greedy diagonal walk. Every cell visited
//! by a walk is recorded in a claimed side-table so it never seeds another
//! maximal run; the bond matrix itself stays untouched and can be reused.
//! Each maximal stem then expands into the group of all stems weakly
//! contained in it.

use log::debug;

use crate::{
    bitmap::BitMatrix,
    sequence::encoded::BondMatrix,
    types::{Stem, StemGroup, StemGroups},
};

/// Enumerate maximal stems and their contained stems.
///
/// Starting cells are scanned by ascending `i`, then ascending `j`, from
/// `j = i + 2 * min_stem + min_loop - 1`. Ties between runs sharing cells
/// resolve in that order, so the result is deterministic.
///
/// # Examples
///
/// ```rust
/// use stemfold_core::sequence::encoded::EncodedSequence;
/// use stemfold_core::stems::enumerate_stems;
///
/// let encoded = EncodedSequence::new(b"gggaaaccc", 2)?;
/// let groups = enumerate_stems(&encoded.bonds, 3, 2);
/// let maximal: Vec<_> = groups.maximal_stems().map(|s| s.as_tuple()).collect();
/// assert_eq!(maximal, vec![(0, 2, 6, 8)]);
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[must_use]
pub fn enumerate_stems(bonds: &BondMatrix, min_stem: usize, min_loop: usize) -> StemGroups {
    let maximal = find_maximal_stems(bonds, min_stem, min_loop);

    let groups: Vec<StemGroup> = maximal
        .into_iter()
        .map(|stem| StemGroup {
            maximal: stem,
            substems: contained_stems(stem, min_stem),
        })
        .collect();

    let groups = StemGroups::new(groups);
    debug!(
        "Enumerated {} maximal stems, {} candidate stems",
        groups.len(),
        groups.stem_count()
    );
    groups
}

/// Greedy consume-on-visit scan for maximal diagonal runs.
fn find_maximal_stems(bonds: &BondMatrix, min_stem: usize, min_loop: usize) -> Vec<Stem> {
    let n = bonds.size();
    let span = min_stem.saturating_mul(2).saturating_add(min_loop);
    let mut claimed = BitMatrix::new(n);
    let mut maximal = Vec::new();

    for i in 0..n.saturating_sub(span) {
        for j in (i + span - 1)..n {
            if !bonds.is_bondable(i, j) || claimed.get(i, j) {
                continue;
            }

            let mut k = 1;
            while bonds.is_bondable(i + k, j - k) && !claimed.get(i + k, j - k) {
                claimed.set(i + k, j - k);
                k += 1;
            }

            if k >= min_stem {
                maximal.push(Stem::from_parts(i, i + k - 1, j + 1 - k, j));
            }
        }
    }

    maximal
}

/// All stems of length at least `min_stem` weakly contained in `maximal`.
///
/// Windows are listed by ascending offset from the outer end, then by
/// ascending inner end, so the maximal stem itself comes from the first
/// offset whenever it is long enough.
#[must_use]
pub fn contained_stems(maximal: Stem, min_stem: usize) -> Vec<Stem> {
    let length = maximal.length();
    if length < min_stem {
        return Vec::new();
    }

    let a = maximal.left_start;
    let d = maximal.right_end;
    (0..=length - min_stem)
        .flat_map(|i| {
            (i + min_stem - 1..length).map(move |k| Stem::from_parts(a + i, a + k, d - k, d - i))
        })
        .collect()
}
