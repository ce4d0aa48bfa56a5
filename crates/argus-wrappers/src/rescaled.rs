//! Per-column rescaling into a normalized range.
//!
//! Lengths (positions, radii, sight ranges, step sizes) are divided by
//! [`TERRAIN_SIZE`], angles by 180 degrees. Counts, flags, cosines,
//! sines and mask bits keep their values. The per-column scale vectors
//! are derived from the layouts and cached with them.
//!
//! When a [`RelativeCoordinates`](crate::RelativeCoordinates) stage sits
//! below, warehouse centres and entry positions are differences of two
//! terrain coordinates and are divided by `2 * TERRAIN_SIZE` instead. The
//! observer's own position stays absolute.

use std::fmt;

use argus_core::consts::{
    CAMERA_STATE_DIM_PRIVATE, NUM_WAREHOUSES, OBSTACLE_STATE_DIM, PRESERVED_DIM,
    TARGET_STATE_DIM_PRIVATE, TERRAIN_SIZE, WAREHOUSE_CENTERS_OFFSET,
};
use argus_core::{
    lineage, AgentKind, ConfigPayload, JointObservation, Population, Stage, StageKind,
    WrapperError,
};
use argus_layout::{FieldName, Layout, LayoutSet};
use ndarray::{Array1, ArrayView2};

use crate::lifecycle::{Lifecycle, Phase};
use crate::order::check_placement;

const NAME: &str = "RescaledObservation";

const LENGTH: f64 = 1.0 / TERRAIN_SIZE;
const RELATIVE_LENGTH: f64 = 1.0 / (2.0 * TERRAIN_SIZE);
const ANGLE: f64 = 1.0 / 180.0;

/// `x, y, radius, cos, sin, theta, max_sight, rotation_step, zooming_step`.
const CAMERA_SCALES: [f64; CAMERA_STATE_DIM_PRIVATE] =
    [LENGTH, LENGTH, LENGTH, 1.0, 1.0, ANGLE, LENGTH, ANGLE, LENGTH];

/// `x, y, sight, is_loaded, step_size, capacity`, then goal and empty bits.
const TARGET_SCALES: [f64; TARGET_STATE_DIM_PRIVATE] = [
    LENGTH, LENGTH, LENGTH, 1.0, LENGTH, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
];

const OBSTACLE_SCALES: [f64; OBSTACLE_STATE_DIM] = [LENGTH; OBSTACLE_STATE_DIM];

fn state_scales(kind: AgentKind) -> &'static [f64] {
    match kind {
        AgentKind::Camera => &CAMERA_SCALES,
        AgentKind::Target => &TARGET_SCALES,
    }
}

/// Scale of every column of rows laid out by `layout`.
///
/// `relative` selects the scale of warehouse centres and entry positions:
/// `1 / (2 * TERRAIN_SIZE)` once they are observer-relative, otherwise
/// `1 / TERRAIN_SIZE`.
pub fn column_scales(layout: &Layout, relative: bool) -> Array1<f64> {
    let position = if relative { RELATIVE_LENGTH } else { LENGTH };
    let mut scales = Vec::with_capacity(layout.width());
    for (name, slice) in layout.iter() {
        match name {
            FieldName::Preserved => {
                let mut header = [1.0; PRESERVED_DIM];
                header[WAREHOUSE_CENTERS_OFFSET..WAREHOUSE_CENTERS_OFFSET + 2 * NUM_WAREHOUSES]
                    .fill(position);
                scales.extend_from_slice(&header);
            }
            FieldName::OwnState => {
                scales.extend_from_slice(&state_scales(layout.kind())[..slice.len()]);
            }
            FieldName::WarehouseEmptyBits => scales.extend(std::iter::repeat_n(1.0, slice.len())),
            FieldName::OpponentStatesWithMask
            | FieldName::ObstacleStatesWithMask
            | FieldName::TeammateStatesWithMask => {
                let entity = match name {
                    FieldName::OpponentStatesWithMask => {
                        let k = layout.kind().opponent();
                        &state_scales(k)[..k.public_dim()]
                    }
                    FieldName::TeammateStatesWithMask => {
                        &state_scales(layout.kind())[..layout.kind().public_dim()]
                    }
                    _ => &OBSTACLE_SCALES[..],
                };
                for _ in 0..slice.count {
                    let start = scales.len();
                    scales.extend_from_slice(entity);
                    scales[start..start + 2].fill(position);
                    scales.push(1.0);
                }
            }
        }
    }
    Array1::from(scales)
}

#[derive(Debug)]
struct Scales {
    layouts: LayoutSet,
    relative: bool,
    camera: Array1<f64>,
    target: Array1<f64>,
}

impl Scales {
    fn derive(inner: &dyn Stage) -> Result<Self, WrapperError> {
        let layouts = LayoutSet::derive(inner.population())?;
        let relative = lineage(inner).contains(&StageKind::RelativeCoordinates);
        Ok(Self {
            camera: column_scales(layouts.camera(), relative),
            target: column_scales(layouts.target(), relative),
            relative,
            layouts,
        })
    }
}

/// Rescaling stage.
#[derive(Debug)]
pub struct RescaledObservation<S> {
    inner: S,
    lifecycle: Lifecycle<Scales>,
}

impl<S: Stage> RescaledObservation<S> {
    /// Wrap `inner`.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidPopulation`] if no layout can be derived.
    pub fn new(inner: S) -> Result<Self, WrapperError> {
        check_placement(StageKind::RescaledObservation, &inner)?;
        let scales = Scales::derive(&inner)?;
        log::debug!(
            "{NAME}: population={} relative={}",
            scales.layouts.population(),
            scales.relative
        );
        Ok(Self {
            inner,
            lifecycle: Lifecycle::ready(scales),
        })
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Cached scales of rows owned by `kind`, or `None` while reconfiguring.
    pub fn scales(&self, kind: AgentKind) -> Option<&Array1<f64>> {
        self.lifecycle.derived().map(|s| match kind {
            AgentKind::Camera => &s.camera,
            AgentKind::Target => &s.target,
        })
    }

    /// Whether positions are scaled as observer-relative, or `None` while
    /// reconfiguring.
    pub fn relative_positions(&self) -> Option<bool> {
        self.lifecycle.derived().map(|s| s.relative)
    }

    /// The wrapped stage.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Stage> Stage for RescaledObservation<S> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> StageKind {
        StageKind::RescaledObservation
    }

    fn inner(&self) -> Option<&dyn Stage> {
        Some(&self.inner)
    }

    fn population(&self) -> Population {
        self.inner.population()
    }

    fn remaining_cargoes(&self) -> ArrayView2<'_, u32> {
        self.inner.remaining_cargoes()
    }

    fn obstacle_states(&self) -> ArrayView2<'_, f64> {
        self.inner.obstacle_states()
    }

    fn reload_config(&mut self, payload: Option<&ConfigPayload>) -> Result<(), WrapperError> {
        let inner = &mut self.inner;
        self.lifecycle.reconfigure(NAME, || {
            inner.reload_config(payload)?;
            Scales::derive(&*inner)
        })
    }

    fn transform(
        &mut self,
        mut observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        let scales = self.lifecycle.current(NAME, "transform")?;
        for kind in [AgentKind::Camera, AgentKind::Target] {
            observation.check_shape(kind, scales.layouts.layout(kind).shape())?;
        }
        observation.camera *= &scales.camera;
        observation.target *= &scales.target;
        Ok(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        self.lifecycle.current(NAME, "observe")?;
        let observation = self.inner.observe()?;
        self.transform(observation)
    }
}

impl<S: fmt::Display> fmt::Display for RescaledObservation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{NAME}{}>", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_layout::{compute_camera_layout, compute_target_layout};

    #[test]
    fn scales_span_the_row() {
        let p = Population::from_counts(3, 2, 4);
        for layout in [compute_camera_layout(&p).unwrap(), compute_target_layout(&p).unwrap()] {
            assert_eq!(column_scales(&layout, false).len(), layout.width());
            assert_eq!(column_scales(&layout, true).len(), layout.width());
        }
    }

    #[test]
    fn mask_bits_and_flags_are_unscaled() {
        let p = Population::from_counts(2, 2, 1);
        let layout = compute_target_layout(&p).unwrap();
        let scales = column_scales(&layout, false);
        for (name, slice) in layout.iter().filter(|(n, _)| n.is_masked()) {
            for i in 0..slice.count {
                assert_eq!(scales[slice.mask_column(i)], 1.0, "{name} entry {i}");
            }
        }
        for col in layout.field(FieldName::WarehouseEmptyBits).range() {
            assert_eq!(scales[col], 1.0);
        }
        // Population counts in the header.
        assert_eq!(scales[0], 1.0);
        assert_eq!(scales[WAREHOUSE_CENTERS_OFFSET], LENGTH);
    }

    #[test]
    fn camera_angles_divide_by_half_turn() {
        let layout = compute_camera_layout(&Population::from_counts(1, 0, 0)).unwrap();
        let scales = column_scales(&layout, false);
        let own = layout.field(FieldName::OwnState).start;
        assert_eq!(scales[own + 5], ANGLE);
        assert_eq!(scales[own + 3], 1.0);
        let mate = layout.field(FieldName::TeammateStatesWithMask).entry(0);
        assert_eq!(scales[mate.start + 5], ANGLE);
    }

    #[test]
    fn relative_positions_use_twice_the_terrain() {
        let layout = compute_target_layout(&Population::from_counts(2, 2, 1)).unwrap();
        let scales = column_scales(&layout, true);
        assert_eq!(scales[WAREHOUSE_CENTERS_OFFSET], RELATIVE_LENGTH);
        assert_eq!(scales[WAREHOUSE_CENTERS_OFFSET + 2 * NUM_WAREHOUSES - 1], RELATIVE_LENGTH);

        let own = layout.field(FieldName::OwnState).start;
        assert_eq!(scales[own], LENGTH);
        assert_eq!(scales[own + 1], LENGTH);

        for (name, slice) in layout.iter().filter(|(n, _)| n.is_masked()) {
            for i in 0..slice.count {
                let entry = slice.entry(i);
                assert_eq!(scales[entry.start], RELATIVE_LENGTH, "{name} entry {i}");
                assert_eq!(scales[entry.start + 1], RELATIVE_LENGTH, "{name} entry {i}");
                // Sizes and ranges are not differences.
                assert_eq!(scales[entry.start + 2], LENGTH, "{name} entry {i}");
            }
        }
    }
}
