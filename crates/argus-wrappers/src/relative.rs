//! Observer-relative coordinates.
//!
//! Subtracts each observer's own `(x, y)` from the warehouse centres in
//! its header and from every visible entry of its masked blocks. Entries
//! whose mask bit is zero carry no information and are left as they are.

use std::fmt;

use argus_core::consts::{NUM_WAREHOUSES, WAREHOUSE_CENTERS_OFFSET};
use argus_core::{
    AgentKind, ConfigPayload, JointObservation, Population, Stage, StageKind, WrapperError,
};
use argus_layout::{FieldName, Layout, LayoutSet};
use ndarray::{Array2, ArrayView2};

use crate::lifecycle::{Lifecycle, Phase};
use crate::order::check_placement;

const NAME: &str = "RelativeCoordinates";

/// Relative-coordinates stage.
#[derive(Debug)]
pub struct RelativeCoordinates<S> {
    inner: S,
    lifecycle: Lifecycle<LayoutSet>,
}

impl<S: Stage> RelativeCoordinates<S> {
    /// Wrap `inner`.
    ///
    /// # Errors
    ///
    /// [`WrapperError::OrderViolation`] if `inner` already rescales, and
    /// [`WrapperError::InvalidPopulation`] if no layout can be derived.
    pub fn new(inner: S) -> Result<Self, WrapperError> {
        check_placement(StageKind::RelativeCoordinates, &inner)?;
        let layouts = LayoutSet::derive(inner.population())?;
        log::debug!("{NAME}: population={}", layouts.population());
        Ok(Self {
            inner,
            lifecycle: Lifecycle::ready(layouts),
        })
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
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

fn relativize(rows: &mut Array2<f64>, layout: &Layout) {
    let own = layout.field(FieldName::OwnState).start;
    let masked: Vec<_> = layout
        .iter()
        .filter(|(name, _)| name.is_masked())
        .map(|(_, slice)| slice)
        .collect();

    for mut row in rows.outer_iter_mut() {
        let (x, y) = (row[own], row[own + 1]);

        for w in 0..NUM_WAREHOUSES {
            let col = WAREHOUSE_CENTERS_OFFSET + 2 * w;
            row[col] -= x;
            row[col + 1] -= y;
        }

        for slice in &masked {
            for i in 0..slice.count {
                if row[slice.mask_column(i)] == 0.0 {
                    continue;
                }
                let start = slice.entry(i).start;
                row[start] -= x;
                row[start + 1] -= y;
            }
        }
    }
}

impl<S: Stage> Stage for RelativeCoordinates<S> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> StageKind {
        StageKind::RelativeCoordinates
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
            Ok(LayoutSet::derive(inner.population())?)
        })
    }

    fn transform(
        &mut self,
        mut observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        let layouts = self.lifecycle.current(NAME, "transform")?;
        for kind in [AgentKind::Camera, AgentKind::Target] {
            observation.check_shape(kind, layouts.layout(kind).shape())?;
        }
        relativize(&mut observation.camera, layouts.camera());
        relativize(&mut observation.target, layouts.target());
        Ok(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        self.lifecycle.current(NAME, "observe")?;
        let observation = self.inner.observe()?;
        self.transform(observation)
    }
}

impl<S: fmt::Display> fmt::Display for RelativeCoordinates<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{NAME}{}>", self.inner)
    }
}
