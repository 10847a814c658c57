//! Packed bit storage for square boolean relations over sequence indices.
//!
//! Both the bond-possibility matrix and the "claimed" side-table used during
//! stem enumeration are n x n relations where only cells with `i < j` are
//! ever set, so they share a single row-major packed representation.

#[inline]
const fn calculate_bit_position(bit_index: usize) -> (usize, u8) {
    (bit_index >> 3, 1 << (bit_index & 0x07))
}

/// Test if a bit is set at the given index
pub fn test_bit(bitmap: &[u8], bit_index: usize) -> bool {
    let (byte_index, bit_mask) = calculate_bit_position(bit_index);
    (bitmap[byte_index] & bit_mask) != 0
}

/// Set a bit to 1 at the given index
pub fn set_bit(bitmap: &mut [u8], bit_index: usize) {
    let (byte_index, bit_mask) = calculate_bit_position(bit_index);
    bitmap[byte_index] |= bit_mask;
}

/// Square bit matrix addressed by `(row, column)`.
///
/// Out-of-range cells and cells on or below the diagonal read as `false`,
/// which lets diagonal walks run off the upper triangle without bounds
/// checks at every call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    size: usize,
    bits: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-false `size x size` matrix.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            bits: vec![0; (size * size).div_ceil(8)],
        }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    const fn bit_index(&self, i: usize, j: usize) -> Option<usize> {
        if i < j && j < self.size {
            Some(i * self.size + j)
        } else {
            None
        }
    }

    /// Read cell `(i, j)`; anything outside the strict upper triangle is `false`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.bit_index(i, j)
            .is_some_and(|bit_index| test_bit(&self.bits, bit_index))
    }

    /// Set cell `(i, j)`. Cells outside the strict upper triangle are ignored.
    pub fn set(&mut self, i: usize, j: usize) {
        if let Some(bit_index) = self.bit_index(i, j) {
            set_bit(&mut self.bits, bit_index);
        }
    }

    /// Number of set cells.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}
