//! Structural conflicts between candidate stems
//!
//! Two kinds of stem pairs matter for model construction: overlapping pairs,
//! which can never coexist in a structure, and crossing (pseudoknot) pairs,
//! which are allowed but penalized. Both searches prune with the maximal
//! stems of each group before comparing contained stems, and both run in
//! parallel over independent pairs of groups.

mod overlaps;
mod pseudoknots;

pub use overlaps::{find_overlaps, overlaps, stems_overlap};
pub use pseudoknots::{is_pseudoknot, may_cross, pseudoknot_terms, PseudoknotPair};
