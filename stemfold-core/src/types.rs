use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constants::NULL_VARIABLE_PREFIX;

/// A run of consecutive antiparallel base pairs.
///
/// Encoded as the 4-tuple `(a, b, c, d)` with `a <= b < c <= d`: index `a`
/// pairs with `d`, `a + 1` with `d - 1`, and so on down to `b` with `c`.
/// The derived ordering is lexicographic on `(a, b, c, d)`.
///
/// # Examples
///
/// ```rust
/// use stemfold_core::types::Stem;
///
/// let stem = Stem::new(0, 2, 10, 12)?;
/// assert_eq!(stem.length(), 3);
/// assert_eq!(stem.pairs().collect::<Vec<_>>(), vec![(0, 12), (1, 11), (2, 10)]);
/// # Ok::<(), stemfold_core::types::FoldError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stem {
    /// First index of the 5' arm (`a`)
    pub left_start: usize,
    /// Last index of the 5' arm (`b`)
    pub left_end: usize,
    /// First index of the 3' arm (`c`)
    pub right_start: usize,
    /// Last index of the 3' arm (`d`)
    pub right_end: usize,
}

impl Stem {
    /// Build a stem, checking the ordering and equal-arm invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidStem`] unless `a <= b < c <= d` and both
    /// arms have the same length.
    pub fn new(a: usize, b: usize, c: usize, d: usize) -> Result<Self, FoldError> {
        if a <= b && b < c && c <= d && b - a == d - c {
            Ok(Self::from_parts(a, b, c, d))
        } else {
            Err(FoldError::InvalidStem(format!("({a}, {b}, {c}, {d})")))
        }
    }

    /// Build a stem whose invariants are guaranteed by construction.
    pub(crate) const fn from_parts(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self {
            left_start: a,
            left_end: b,
            right_start: c,
            right_end: d,
        }
    }

    /// Number of base pairs in the stem.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.left_end - self.left_start + 1
    }

    /// The stem as a plain `(a, b, c, d)` tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (
            self.left_start,
            self.left_end,
            self.right_start,
            self.right_end,
        )
    }

    /// Base pairs `(a + i, d - i)` from the outside in.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.length()).map(move |i| (self.left_start + i, self.right_end - i))
    }

    /// Whether `index` lies on either arm.
    #[must_use]
    pub const fn covers(&self, index: usize) -> bool {
        (self.left_start <= index && index <= self.left_end)
            || (self.right_start <= index && index <= self.right_end)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left_start, self.left_end, self.right_start, self.right_end
        )
    }
}

impl FromStr for Stem {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| FoldError::UnknownVariable(s.to_string()))?;

        let values = inner
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| FoldError::UnknownVariable(s.to_string()))?;

        match values.as_slice() {
            &[a, b, c, d] => Self::new(a, b, c, d),
            _ => Err(FoldError::UnknownVariable(s.to_string())),
        }
    }
}

impl Serialize for Stem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Stem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// A binary decision variable of the selection model.
///
/// Stem variables mean "this stem is in the structure". A null variable is
/// attached to one maximal stem in the constrained encoding and means "none
/// of this group's stems is selected". Labels follow the `(a, b, c, d)` and
/// `Null:(a, b, c, d)` conventions and are used for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    /// Indicator of a single stem
    Stem(Stem),
    /// "Nothing selected" slack of the group keyed by this maximal stem
    Null(Stem),
}

impl Variable {
    /// The stem behind a stem variable; `None` for null variables.
    #[must_use]
    pub const fn stem(&self) -> Option<Stem> {
        match self {
            Self::Stem(stem) => Some(*stem),
            Self::Null(_) => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }
}

impl From<Stem> for Variable {
    fn from(stem: Stem) -> Self {
        Self::Stem(stem)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stem(stem) => write!(f, "{stem}"),
            Self::Null(stem) => write!(f, "{NULL_VARIABLE_PREFIX}{stem}"),
        }
    }
}

impl FromStr for Variable {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().strip_prefix(NULL_VARIABLE_PREFIX) {
            Some(rest) => rest.parse().map(Self::Null),
            None => s.parse().map(Self::Stem),
        }
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// A maximal stem and every stem weakly contained in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemGroup {
    /// The maximal stem keying the group
    pub maximal: Stem,
    /// Contained stems of at least the minimum length, the maximal stem included
    pub substems: Vec<Stem>,
}

/// All stem groups of a sequence, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StemGroups {
    groups: Vec<StemGroup>,
}

impl StemGroups {
    #[must_use]
    pub const fn new(groups: Vec<StemGroup>) -> Self {
        Self { groups }
    }

    /// Number of maximal stems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StemGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[StemGroup] {
        &self.groups
    }

    /// Group keyed by `maximal`, if any.
    #[must_use]
    pub fn get(&self, maximal: &Stem) -> Option<&StemGroup> {
        self.groups.iter().find(|group| group.maximal == *maximal)
    }

    /// Maximal stems in discovery order.
    pub fn maximal_stems(&self) -> impl Iterator<Item = Stem> + '_ {
        self.groups.iter().map(|group| group.maximal)
    }

    /// Every candidate stem across all groups.
    pub fn all_stems(&self) -> impl Iterator<Item = Stem> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.substems.iter().copied())
    }

    /// Total number of candidate stems.
    #[must_use]
    pub fn stem_count(&self) -> usize {
        self.groups.iter().map(|group| group.substems.len()).sum()
    }

    /// Length of the longest maximal stem, `None` when there are no stems.
    #[must_use]
    pub fn longest_stem_length(&self) -> Option<usize> {
        self.groups.iter().map(|group| group.maximal.length()).max()
    }
}

impl<'a> IntoIterator for &'a StemGroups {
    type Item = &'a StemGroup;
    type IntoIter = std::slice::Iter<'a, StemGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Error types that can occur while building or resolving a folding model
#[derive(Error, Debug)]
pub enum FoldError {
    /// Input sequence contains unsupported symbols or is empty
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// Parameter validation failed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A 4-tuple violates the stem invariants
    #[error("Invalid stem: {0}")]
    InvalidStem(String),
    /// A variable label could not be parsed
    #[error("Unknown variable label: {0}")]
    UnknownVariable(String),
    /// Every candidate returned by the solver is infeasible
    #[error("All candidate solutions are infeasible; consider changing the parameters")]
    AllCandidatesInfeasible,
    /// The external solver failed to return a sample set
    #[error("Solver error: {0}")]
    SolverError(String),
    /// Results cannot be rendered in the requested format
    #[error("Output error: {0}")]
    OutputError(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
}
