//! Fixed field widths shared by every layout.
//!
//! These never change at runtime. Only the population counts vary, and
//! the layout schema multiplies them by the widths below.

/// Number of warehouses on the terrain.
pub const NUM_WAREHOUSES: usize = 4;

/// Width of the header at the start of every observation row.
///
/// Holds the three population counts, a self-kind flag (0 = camera,
/// 1 = target), the observer's index, and the `(x, y)` centre of each
/// warehouse.
pub const PRESERVED_DIM: usize = 5 + 2 * NUM_WAREHOUSES;

/// Column of the first warehouse centre within the header.
pub const WAREHOUSE_CENTERS_OFFSET: usize = 5;

/// Public camera state: `x, y, radius, cos(phi), sin(phi), theta`.
pub const CAMERA_STATE_DIM_PUBLIC: usize = 6;

/// Private camera state: public state followed by
/// `max_sight_range, rotation_step, zooming_step`.
pub const CAMERA_STATE_DIM_PRIVATE: usize = 9;

/// Public target state: `x, y, sight_range, is_loaded`.
pub const TARGET_STATE_DIM_PUBLIC: usize = 4;

/// Private target state: public state followed by `step_size, capacity`,
/// one goal bit per warehouse, and one empty bit per warehouse.
pub const TARGET_STATE_DIM_PRIVATE: usize = 6 + 2 * NUM_WAREHOUSES;

/// Obstacle state: `x, y, radius`. Obstacles have no private fields.
pub const OBSTACLE_STATE_DIM: usize = 3;

/// Half-width of the square terrain `[-TERRAIN_SIZE, TERRAIN_SIZE]^2`.
pub const TERRAIN_SIZE: f64 = 1000.0;

/// Number of flag columns appended to each entry of a `…_with_mask` block.
pub const MASK_DIM: usize = 1;
