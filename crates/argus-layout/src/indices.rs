//! Coarse anchor offsets within a target row.

use std::ops::Range;

use argus_core::consts::{NUM_WAREHOUSES, PRESERVED_DIM, TARGET_STATE_DIM_PRIVATE};
use argus_core::{Population, PopulationError};

use crate::layout::compute_target_layout;

/// Anchor columns of a target row.
///
/// The warehouse-empty bits are the tail of the target's private state,
/// so they sit immediately before the opponent block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetIndices {
    /// First column of the target's own state.
    pub own_state: usize,
    /// First warehouse-empty bit.
    pub empty_bits: usize,
    /// First column of the opponent (camera) block.
    pub opponent_block: usize,
    /// Total row width.
    pub row_width: usize,
}

impl TargetIndices {
    /// Columns of the warehouse-empty bits.
    pub const fn empty_bits_slice(&self) -> Range<usize> {
        self.empty_bits..self.opponent_block
    }
}

/// Compute the anchors of a target row.
///
/// # Errors
///
/// [`PopulationError::WidthOverflow`] if the row width does not fit in `usize`.
pub fn compute_target_indices(population: &Population) -> Result<TargetIndices, PopulationError> {
    let opponent_block = PRESERVED_DIM + TARGET_STATE_DIM_PRIVATE;
    Ok(TargetIndices {
        own_state: PRESERVED_DIM,
        empty_bits: opponent_block - NUM_WAREHOUSES,
        opponent_block,
        row_width: compute_target_layout(population)?.width(),
    })
}
