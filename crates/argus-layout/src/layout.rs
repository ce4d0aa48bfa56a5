//! Camera and target row layouts.
//!
//! Field order and widths, per row kind:
//!
//! | Field | Camera row | Target row |
//! |-------|------------|------------|
//! | preserved header | `PRESERVED_DIM` | `PRESERVED_DIM` |
//! | own state | `CAMERA_STATE_DIM_PRIVATE` | `TARGET_STATE_DIM_PRIVATE - NUM_WAREHOUSES` |
//! | warehouse-empty bits | none | `NUM_WAREHOUSES` |
//! | opponents | `T × (TARGET_STATE_DIM_PUBLIC + 1)` | `C × (CAMERA_STATE_DIM_PUBLIC + 1)` |
//! | obstacles | `O × (OBSTACLE_STATE_DIM + 1)` | `O × (OBSTACLE_STATE_DIM + 1)` |
//! | teammates | `C × (CAMERA_STATE_DIM_PUBLIC + 1)` | `T × (TARGET_STATE_DIM_PUBLIC + 1)` |
//!
//! The teammate block holds every member of the observer's team,
//! including the observer itself.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use argus_core::consts::{MASK_DIM, NUM_WAREHOUSES, OBSTACLE_STATE_DIM, PRESERVED_DIM};
use argus_core::{AgentKind, Population, PopulationError};

use crate::field::{FieldName, FieldSlice};

/// Offsets of every field in one row kind, for one population.
///
/// Fields are stored in row order. Ranges are pairwise disjoint and
/// together span `0..width()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    kind: AgentKind,
    population: Population,
    fields: IndexMap<FieldName, FieldSlice>,
    width: usize,
}

impl Layout {
    /// Row kind this layout describes.
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Population the layout was derived from.
    pub fn population(&self) -> Population {
        self.population
    }

    /// Total row width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows a joint observation holds for this kind.
    pub fn rows(&self) -> usize {
        match self.kind {
            AgentKind::Camera => self.population.num_cameras(),
            AgentKind::Target => self.population.num_targets(),
        }
    }

    /// Expected `(rows, width)` of the matrix this layout partitions.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.width)
    }

    /// Look up a field.
    pub fn get(&self, name: FieldName) -> Option<FieldSlice> {
        self.fields.get(&name).copied()
    }

    /// Look up a field. Fields this row kind does not have (warehouse bits
    /// in camera rows) come back as an empty slice at the end of the row.
    pub fn field(&self, name: FieldName) -> FieldSlice {
        self.get(name)
            .unwrap_or(FieldSlice::new(self.width, 0, 0))
    }

    /// Iterate `(name, slice)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, FieldSlice)> + '_ {
        self.fields.iter().map(|(&name, &slice)| (name, slice))
    }

    /// Check that fields are contiguous, disjoint, and span the row.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutGap`] found.
    pub fn validate_coverage(&self) -> Result<(), LayoutGap> {
        let mut cursor = 0;
        for (name, slice) in self.iter() {
            if slice.start != cursor {
                return Err(LayoutGap {
                    field: Some(name),
                    expected_start: cursor,
                    actual_start: slice.start,
                });
            }
            cursor = slice.end();
        }
        if cursor != self.width {
            return Err(LayoutGap {
                field: None,
                expected_start: self.width,
                actual_start: cursor,
            });
        }
        Ok(())
    }
}

/// A hole or overlap found by [`Layout::validate_coverage`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutGap {
    /// Field that starts at the wrong column, or `None` if the fields end
    /// before or after the declared width.
    pub field: Option<FieldName>,
    /// Where the field should start.
    pub expected_start: usize,
    /// Where it actually starts.
    pub actual_start: usize,
}

impl fmt::Display for LayoutGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(name) => write!(
                f,
                "field {name} starts at column {}, expected {}",
                self.actual_start, self.expected_start
            ),
            None => write!(
                f,
                "fields end at column {}, row width is {}",
                self.actual_start, self.expected_start
            ),
        }
    }
}

impl Error for LayoutGap {}

/// Accumulates fields left to right with overflow checking.
struct LayoutBuilder {
    kind: AgentKind,
    population: Population,
    fields: IndexMap<FieldName, FieldSlice>,
    cursor: usize,
}

impl LayoutBuilder {
    fn new(kind: AgentKind, population: Population) -> Self {
        Self {
            kind,
            population,
            fields: IndexMap::with_capacity(6),
            cursor: 0,
        }
    }

    fn push(
        &mut self,
        name: FieldName,
        count: usize,
        stride: usize,
    ) -> Result<(), PopulationError> {
        let overflow = || PopulationError::WidthOverflow {
            num_cameras: self.population.num_cameras(),
            num_targets: self.population.num_targets(),
            num_obstacles: self.population.num_obstacles(),
        };
        let len = count.checked_mul(stride).ok_or_else(overflow)?;
        let end = self.cursor.checked_add(len).ok_or_else(overflow)?;
        self.fields
            .insert(name, FieldSlice::new(self.cursor, count, stride));
        self.cursor = end;
        Ok(())
    }

    fn finish(self) -> Layout {
        Layout {
            kind: self.kind,
            population: self.population,
            fields: self.fields,
            width: self.cursor,
        }
    }
}

fn count_of(kind: AgentKind, population: &Population) -> usize {
    match kind {
        AgentKind::Camera => population.num_cameras(),
        AgentKind::Target => population.num_targets(),
    }
}

/// Compute the layout of rows owned by `kind`.
///
/// Negative counts are rejected when the [`Population`] is built, so this
/// is total for every population except those whose width overflows.
///
/// # Errors
///
/// [`PopulationError::WidthOverflow`] if the row width does not fit in `usize`.
pub fn compute_layout(kind: AgentKind, population: &Population) -> Result<Layout, PopulationError> {
    let opponent = kind.opponent();
    let mut b = LayoutBuilder::new(kind, *population);

    b.push(FieldName::Preserved, 1, PRESERVED_DIM)?;
    match kind {
        AgentKind::Camera => b.push(FieldName::OwnState, 1, kind.private_dim())?,
        AgentKind::Target => {
            b.push(FieldName::OwnState, 1, kind.private_dim() - NUM_WAREHOUSES)?;
            b.push(FieldName::WarehouseEmptyBits, 1, NUM_WAREHOUSES)?;
        }
    }
    b.push(
        FieldName::OpponentStatesWithMask,
        count_of(opponent, population),
        opponent.public_dim() + MASK_DIM,
    )?;
    b.push(
        FieldName::ObstacleStatesWithMask,
        population.num_obstacles(),
        OBSTACLE_STATE_DIM + MASK_DIM,
    )?;
    b.push(
        FieldName::TeammateStatesWithMask,
        count_of(kind, population),
        kind.public_dim() + MASK_DIM,
    )?;

    Ok(b.finish())
}

/// Layout of camera rows.
///
/// # Errors
///
/// See [`compute_layout`].
pub fn compute_camera_layout(population: &Population) -> Result<Layout, PopulationError> {
    compute_layout(AgentKind::Camera, population)
}

/// Layout of target rows.
///
/// # Errors
///
/// See [`compute_layout`].
pub fn compute_target_layout(population: &Population) -> Result<Layout, PopulationError> {
    compute_layout(AgentKind::Target, population)
}
