use rayon::prelude::*;

use crate::types::{Stem, StemGroup, StemGroups};

/// A crossing pair of stems with its soft penalty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoknotPair {
    /// Stem whose 5' arm comes first
    pub first: Stem,
    /// Stem whose 5' arm sits between the arms of `first`
    pub second: Stem,
    /// `c * len(first) * len(second)`
    pub weight: f64,
}

/// Whether `s1` and `s2` cross: `b1 < a2`, `b2 < c1` and `d1 < c2`.
///
/// The test is ordered. A crossing holds only with the stem that starts
/// first as `s1`, so each crossing pair is reported once.
#[inline]
pub const fn is_pseudoknot(s1: &Stem, s2: &Stem) -> bool {
    s1.left_end < s2.left_start
        && s2.left_end < s1.right_start
        && s1.right_end < s2.right_start
}

/// Coarse separation screen for crossings between the groups of `max1`
/// and `max2`, with the first one leading.
///
/// Both arms of `max1` must start more than `2 * min_stem` bases before the
/// matching arms of `max2` end: `a1 + 2m < b2` and `c1 + 2m < d2`.
#[inline]
pub const fn may_cross(max1: &Stem, max2: &Stem, min_stem: usize) -> bool {
    let reach = min_stem.saturating_mul(2);
    max1.left_start.saturating_add(reach) < max2.left_end
        && max1.right_start.saturating_add(reach) < max2.right_end
}

/// Soft penalty terms for every crossing pair of contained stems.
///
/// Ordered pairs of distinct groups are screened with [`may_cross`]; cross
/// pairs of their contained stems that satisfy [`is_pseudoknot`] get weight
/// `coefficient * len(s1) * len(s2)`, so longer crossings cost more while
/// remaining far below the overlap penalty.
pub fn pseudoknot_terms(
    groups: &StemGroups,
    min_stem: usize,
    coefficient: f64,
) -> Vec<PseudoknotPair> {
    let groups = groups.as_slice();

    (0..groups.len())
        .into_par_iter()
        .flat_map_iter(|first| {
            let first_group = &groups[first];
            groups
                .iter()
                .enumerate()
                .filter(move |&(second, second_group)| {
                    second != first
                        && may_cross(&first_group.maximal, &second_group.maximal, min_stem)
                })
                .flat_map(move |(_, second_group)| {
                    crossing_substems(first_group, second_group, coefficient)
                })
        })
        .collect()
}

fn crossing_substems<'a>(
    first: &'a StemGroup,
    second: &'a StemGroup,
    coefficient: f64,
) -> impl Iterator<Item = PseudoknotPair> + 'a {
    first.substems.iter().flat_map(move |s1| {
        second
            .substems
            .iter()
            .filter(move |s2| is_pseudoknot(s1, s2))
            .map(move |s2| PseudoknotPair {
                first: *s1,
                second: *s2,
                weight: coefficient * (s1.length() * s2.length()) as f64,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::stems_overlap;
    use crate::sequence::encoded::EncodedSequence;
    use crate::stems::{contained_stems, enumerate_stems};
    use approx::assert_relative_eq;

    fn stem(a: usize, b: usize, c: usize, d: usize) -> Stem {
        Stem::new(a, b, c, d).unwrap()
    }

    fn create_test_group(maximal: Stem, min_stem: usize) -> StemGroup {
        StemGroup {
            maximal,
            substems: contained_stems(maximal, min_stem),
        }
    }

    #[test]
    fn test_crossing_is_ordered() {
        let s1 = stem(0, 2, 10, 12);
        let s2 = stem(5, 7, 15, 17);

        assert!(is_pseudoknot(&s1, &s2));
        assert!(!is_pseudoknot(&s2, &s1));
        assert!(!stems_overlap(&s1, &s2));
    }

    #[test]
    fn test_nested_and_sequential_are_not_crossings() {
        let outer = stem(0, 2, 20, 22);
        let inner = stem(5, 7, 12, 14);
        let after = stem(25, 27, 32, 34);

        for (x, y) in [(outer, inner), (outer, after), (inner, after)] {
            assert!(!is_pseudoknot(&x, &y));
            assert!(!is_pseudoknot(&y, &x));
        }
    }

    #[test]
    fn test_may_cross_is_strict() {
        let s1 = stem(0, 2, 10, 12);
        let s2 = stem(5, 7, 15, 17);
        assert!(may_cross(&s1, &s2, 3));
        assert!(!may_cross(&s2, &s1, 3));

        // a1 + 2m == b2 is screened out
        assert!(!may_cross(&stem(0, 2, 10, 12), &stem(4, 6, 15, 17), 3));
        // Tight crossing: second's 5' arm ends at a1 + 5
        let tight = stem(3, 5, 9, 11);
        assert!(is_pseudoknot(&stem(0, 2, 6, 8), &tight));
        assert!(!may_cross(&stem(0, 2, 6, 8), &tight, 3));
    }

    #[test]
    fn test_may_cross_large_min_stem() {
        let s1 = stem(0, 2, 10, 12);
        let s2 = stem(5, 7, 15, 17);
        assert!(!may_cross(&s1, &s2, usize::MAX));
    }

    #[test]
    fn test_short_sequence_has_no_screened_crossings() {
        let encoded = EncodedSequence::new(b"gggaaacccuuu", 2).unwrap();
        let groups = enumerate_stems(&encoded.bonds, 3, 2);
        assert!(!groups.is_empty());
        assert!(pseudoknot_terms(&groups, 3, 0.3).is_empty());
    }

    #[test]
    fn test_weight_scales_with_lengths() {
        let groups = StemGroups::new(vec![
            create_test_group(stem(0, 3, 10, 13), 4),
            create_test_group(stem(5, 7, 15, 17), 3),
        ]);

        let terms = pseudoknot_terms(&groups, 3, 0.3);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].first, stem(0, 3, 10, 13));
        assert_eq!(terms[0].second, stem(5, 7, 15, 17));
        assert_relative_eq!(terms[0].weight, 0.3 * 4.0 * 3.0);
    }

    #[test]
    fn test_each_crossing_reported_once() {
        let encoded = EncodedSequence::new(b"ggguuccaaggaauccuugguuccaagggaaccc", 2).unwrap();
        let groups = enumerate_stems(&encoded.bonds, 3, 2);
        let terms = pseudoknot_terms(&groups, 3, 0.3);

        for term in &terms {
            assert!(is_pseudoknot(&term.first, &term.second));
            assert!(!terms
                .iter()
                .any(|other| other.first == term.second && other.second == term.first));
        }
    }

    #[test]
    fn test_search_matches_screened_pairwise_scan() {
        let seqs: [&[u8]; 3] = [
            b"gggaaacccaaaggguuu",
            b"ggguuccaaggaauccuugguuccaagggaaccc",
            b"gcgcaaaaggcgcuuuugcgcaaaagcgcc",
        ];

        for seq in seqs {
            for min_stem in 2..=3 {
                let encoded = EncodedSequence::new(seq, 2).unwrap();
                let groups = enumerate_stems(&encoded.bonds, min_stem, 2);

                let reach = 2 * min_stem;
                let mut expected = Vec::new();
                for (i, g1) in groups.iter().enumerate() {
                    for (j, g2) in groups.iter().enumerate() {
                        if i == j
                            || g1.maximal.left_start + reach >= g2.maximal.left_end
                            || g1.maximal.right_start + reach >= g2.maximal.right_end
                        {
                            continue;
                        }
                        for s1 in &g1.substems {
                            for s2 in &g2.substems {
                                if is_pseudoknot(s1, s2) {
                                    expected.push((*s1, *s2));
                                }
                            }
                        }
                    }
                }

                let found: Vec<_> = pseudoknot_terms(&groups, min_stem, 0.3)
                    .into_iter()
                    .map(|term| (term.first, term.second))
                    .collect();
                assert_eq!(found, expected);
            }
        }
    }

    #[test]
    fn test_crossings_never_overlap() {
        let encoded = EncodedSequence::new(b"ggguuccaaggaauccuugguuccaagggaaccc", 2).unwrap();
        let groups = enumerate_stems(&encoded.bonds, 2, 2);
        for term in pseudoknot_terms(&groups, 2, 0.3) {
            assert!(!stems_overlap(&term.first, &term.second));
        }
    }

    #[test]
    fn test_no_groups() {
        assert!(pseudoknot_terms(&StemGroups::default(), 3, 0.3).is_empty());
    }
}
