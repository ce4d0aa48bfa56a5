//! Field names and the [`FieldSlice`] offset descriptor.

use std::fmt;
use std::ops::Range;

/// Semantic section of an observation row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    /// Fixed-width header. Never rewritten by enhancement.
    Preserved,
    /// The observer's own state (public and private fields).
    OwnState,
    /// One bit per warehouse, target rows only.
    WarehouseEmptyBits,
    /// Opponent public states, each followed by a mask bit.
    OpponentStatesWithMask,
    /// Obstacle states, each followed by a mask bit.
    ObstacleStatesWithMask,
    /// Teammate public states, each followed by a mask bit.
    TeammateStatesWithMask,
}

impl FieldName {
    /// Snake-case name used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preserved => "preserved_data",
            Self::OwnState => "self_state",
            Self::WarehouseEmptyBits => "warehouse_empty_bits",
            Self::OpponentStatesWithMask => "opponent_states_with_mask",
            Self::ObstacleStatesWithMask => "obstacle_states_with_mask",
            Self::TeammateStatesWithMask => "teammate_states_with_mask",
        }
    }

    /// Whether entries of this field end with a mask bit.
    pub const fn is_masked(self) -> bool {
        matches!(
            self,
            Self::OpponentStatesWithMask | Self::ObstacleStatesWithMask | Self::TeammateStatesWithMask
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of `count` entries, each `stride` columns wide.
///
/// Unmasked fields are a single entry (`count == 1`). Masked blocks have
/// one entry per agent or obstacle; the last column of each entry is the
/// mask bit.
///
/// # Examples
///
/// ```
/// use argus_layout::FieldSlice;
///
/// // Three obstacles, (x, y, radius) + mask.
/// let s = FieldSlice::new(20, 3, 4);
/// assert_eq!(s.range(), 20..32);
/// assert_eq!(s.entry(1), 24..28);
/// assert_eq!(s.mask_column(2), 31);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldSlice {
    /// First column.
    pub start: usize,
    /// Number of entries.
    pub count: usize,
    /// Columns per entry.
    pub stride: usize,
}

impl FieldSlice {
    /// Create a slice descriptor.
    pub const fn new(start: usize, count: usize, stride: usize) -> Self {
        Self {
            start,
            count,
            stride,
        }
    }

    /// Total number of columns.
    pub const fn len(&self) -> usize {
        self.count * self.stride
    }

    /// Whether the slice covers no columns.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last column.
    pub const fn end(&self) -> usize {
        self.start + self.len()
    }

    /// Column range of the whole slice.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Column range of entry `i`.
    pub const fn entry(&self, i: usize) -> Range<usize> {
        let start = self.start + i * self.stride;
        start..start + self.stride
    }

    /// Column of the mask bit of entry `i` (the entry's last column).
    pub const fn mask_column(&self, i: usize) -> usize {
        self.start + (i + 1) * self.stride - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_has_empty_range() {
        let s = FieldSlice::new(42, 0, 7);
        assert!(s.is_empty());
        assert_eq!(s.range(), 42..42);
    }

    #[test]
    fn entries_tile_the_slice() {
        let s = FieldSlice::new(10, 4, 5);
        let mut next = s.start;
        for i in 0..s.count {
            let e = s.entry(i);
            assert_eq!(e.start, next);
            assert_eq!(s.mask_column(i), e.end - 1);
            next = e.end;
        }
        assert_eq!(next, s.end());
    }

    #[test]
    fn only_blocks_are_masked() {
        assert!(FieldName::TeammateStatesWithMask.is_masked());
        assert!(!FieldName::WarehouseEmptyBits.is_masked());
        assert!(!FieldName::OwnState.is_masked());
    }
}
