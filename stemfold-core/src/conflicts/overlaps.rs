use rayon::prelude::*;

use crate::types::{Stem, StemGroup, StemGroups, Variable};

/// Check if two stems use any of the same nucleotides
///
/// Every endpoint of `s2` is tested against both arms of `s1`; of `s1` only
/// the inner endpoints `b` and `c` need testing against `s2`, which covers
/// the remaining ways two arm intervals can intersect.
#[inline]
pub fn stems_overlap(s1: &Stem, s2: &Stem) -> bool {
    let (a2, b2, c2, d2) = s2.as_tuple();
    [a2, b2, c2, d2].into_iter().any(|index| s1.covers(index))
        || s2.covers(s1.left_end)
        || s2.covers(s1.right_start)
}

/// Overlap test on decision variables; null variables never overlap
pub fn overlaps(v1: &Variable, v2: &Variable) -> bool {
    match (v1, v2) {
        (Variable::Stem(s1), Variable::Stem(s2)) => stems_overlap(s1, s2),
        _ => false,
    }
}

/// Find every overlapping pair of stems from different groups.
///
/// For each pair of distinct groups the maximal stems are compared first;
/// contained stems are only compared when their maximal stems overlap,
/// since a contained stem uses a subset of its maximal stem's nucleotides.
/// Pairs are listed by group pair, then by position within each group.
pub fn find_overlaps(groups: &StemGroups) -> Vec<(Stem, Stem)> {
    let groups = groups.as_slice();

    (0..groups.len())
        .into_par_iter()
        .flat_map_iter(|first| {
            let first_group = &groups[first];
            groups[first + 1..]
                .iter()
                .filter(move |second| stems_overlap(&first_group.maximal, &second.maximal))
                .flat_map(move |second| overlapping_substems(first_group, second))
        })
        .collect()
}

/// Cross pairs of contained stems that overlap
fn overlapping_substems<'a>(
    first: &'a StemGroup,
    second: &'a StemGroup,
) -> impl Iterator<Item = (Stem, Stem)> + 'a {
    first.substems.iter().flat_map(move |s1| {
        second
            .substems
            .iter()
            .filter(move |s2| stems_overlap(s1, s2))
            .map(move |s2| (*s1, *s2))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::encoded::EncodedSequence;
    use crate::stems::enumerate_stems;
    use std::collections::BTreeSet;

    fn stem(a: usize, b: usize, c: usize, d: usize) -> Stem {
        Stem::new(a, b, c, d).unwrap()
    }

    fn normalized(pairs: &[(Stem, Stem)]) -> BTreeSet<(Stem, Stem)> {
        pairs
            .iter()
            .map(|&(x, y)| if x <= y { (x, y) } else { (y, x) })
            .collect()
    }

    /// Unpruned search over every cross-group pair of contained stems
    fn find_overlaps_exhaustive(groups: &StemGroups) -> Vec<(Stem, Stem)> {
        let groups = groups.as_slice();
        let mut pairs = Vec::new();
        for (i, first) in groups.iter().enumerate() {
            for second in &groups[i + 1..] {
                for s1 in &first.substems {
                    for s2 in &second.substems {
                        if stems_overlap(s1, s2) {
                            pairs.push((*s1, *s2));
                        }
                    }
                }
            }
        }
        pairs
    }

    #[test]
    fn test_identical_stems_overlap() {
        let s = stem(0, 2, 10, 12);
        assert!(stems_overlap(&s, &s));
        assert!(stems_overlap(&s, &stem(0, 2, 10, 12)));
    }

    #[test]
    fn test_disjoint_stems() {
        let s1 = stem(0, 2, 10, 12);
        let s2 = stem(3, 5, 7, 9);
        assert!(!stems_overlap(&s1, &s2));
        assert!(!stems_overlap(&s2, &s1));
    }

    #[test]
    fn test_shared_single_index() {
        let s1 = stem(0, 2, 10, 12);
        let s2 = stem(12, 14, 20, 22);
        assert!(stems_overlap(&s1, &s2));
        assert!(stems_overlap(&s2, &s1));
    }

    #[test]
    fn test_inner_endpoint_only_overlap() {
        // s2 arm [1, 6] swallows s1's 5' arm end without any s2 endpoint on s1
        let s1 = stem(3, 4, 20, 21);
        let s2 = stem(1, 6, 10, 15);
        assert!(stems_overlap(&s1, &s2));
        assert!(stems_overlap(&s2, &s1));
    }

    #[test]
    fn test_overlap_is_symmetric_and_reflexive() {
        let mut stems = Vec::new();
        for a in 0..4 {
            for len in 1..3 {
                for c in (a + len)..(a + len + 5) {
                    stems.push(stem(a, a + len - 1, c, c + len - 1));
                }
            }
        }

        for s1 in &stems {
            assert!(stems_overlap(s1, s1));
            for s2 in &stems {
                let shares_index = (0..20).any(|i| s1.covers(i) && s2.covers(i));
                assert_eq!(stems_overlap(s1, s2), stems_overlap(s2, s1), "{s1} {s2}");
                assert_eq!(stems_overlap(s1, s2), shares_index, "{s1} {s2}");
            }
        }
    }

    #[test]
    fn test_null_variable_never_overlaps() {
        let s = stem(0, 2, 10, 12);
        assert!(!overlaps(&Variable::Null(s), &Variable::Stem(s)));
        assert!(!overlaps(&Variable::Stem(s), &Variable::Null(s)));
        assert!(!overlaps(&Variable::Null(s), &Variable::Null(s)));
        assert!(overlaps(&Variable::Stem(s), &Variable::Stem(s)));
    }

    #[test]
    fn test_pruned_search_matches_exhaustive() {
        let seqs: [&[u8]; 3] = [
            b"gggaaacccaaaggguuu",
            b"gcgcuuagcgcaaagcgcuaaaagcgc",
            b"ggguuccaaggaauccuugguuccaagggaaccc",
        ];

        for seq in seqs {
            for min_stem in 2..=3 {
                let encoded = EncodedSequence::new(seq, 2).unwrap();
                let groups = enumerate_stems(&encoded.bonds, min_stem, 2);

                let pruned = find_overlaps(&groups);
                let exhaustive = find_overlaps_exhaustive(&groups);
                assert_eq!(pruned.len(), exhaustive.len());
                assert_eq!(normalized(&pruned), normalized(&exhaustive));
            }
        }
    }

    #[test]
    fn test_find_overlaps_skips_same_group() {
        let maximal = stem(0, 3, 10, 13);
        let groups = StemGroups::new(vec![StemGroup {
            maximal,
            substems: crate::stems::contained_stems(maximal, 3),
        }]);
        assert!(find_overlaps(&groups).is_empty());
    }

    #[test]
    fn test_find_overlaps_is_ordered() {
        let encoded = EncodedSequence::new(b"gcgcuuagcgcaaagcgcuaaaagcgc", 2).unwrap();
        let groups = enumerate_stems(&encoded.bonds, 3, 2);
        assert_eq!(find_overlaps(&groups), find_overlaps_exhaustive(&groups));
    }
}
