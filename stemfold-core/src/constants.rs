// =============================================================================
// =============================================================================

/// Default minimum number of consecutive base pairs forming a stem
pub const DEFAULT_MIN_STEM: usize = 3;

/// Default minimum number of unpaired nucleotides enclosed by a pair
pub const DEFAULT_MIN_LOOP: usize = 2;

/// Default scale of the soft penalty applied to crossing stems
pub const DEFAULT_PSEUDOKNOT_COEFFICIENT: f64 = 0.3;

/// Margin added to the squared longest stem length when deriving the overlap penalty
pub const PENALTY_WEIGHT_MARGIN: f64 = 3.0;

/// Default number of reads requested from an unconstrained sampler
pub const DEFAULT_NUM_READS: usize = 20;

// =============================================================================
// =============================================================================

/// Allowed hydrogen-bonding pairs, in either orientation
///
/// `t` stands in for `u`; databases differ in which one they record.
pub const HYDROGEN_BONDS: [(u8, u8); 5] = [
    (b'a', b't'),
    (b'a', b'u'),
    (b'c', b'g'),
    (b'g', b't'),
    (b'g', b'u'),
];

/// Symbols accepted in an input sequence (after lowercasing)
pub const NUCLEOTIDE_SYMBOLS: &[u8] = b"acgtu";

/// Prefix of the label given to a group's "nothing selected" variable
pub const NULL_VARIABLE_PREFIX: &str = "Null:";

/// Bracket pairs used when rendering crossing stems in dot-bracket notation
pub const BRACKET_PAIRS: [(u8, u8); 4] = [(b'(', b')'), (b'[', b']'), (b'{', b'}'), (b'<', b'>')];
