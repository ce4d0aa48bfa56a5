//! Full-visibility enhancement.
//!
//! [`EnhancedObservation`] overwrites the masked blocks of the selected
//! team's rows with the true public state of every agent and obstacle,
//! each flagged visible. Target rows also get the fleet-wide
//! warehouse-empty bits. The preserved header, the observer's own state,
//! and the rows of unselected teams pass through untouched.
//!
//! The stage must sit below any stage that relativizes or rescales
//! coordinates, since it writes raw absolute values.

use std::fmt;

use argus_core::consts::{MASK_DIM, NUM_WAREHOUSES, OBSTACLE_STATE_DIM};
use argus_core::{
    AgentKind, ConfigPayload, JointObservation, Population, Stage, StageKind, Team, WrapperError,
};
use argus_layout::{FieldName, FieldSlice, LayoutSet};
use ndarray::{s, Array1, Array2, ArrayView2};

use crate::lifecycle::{Lifecycle, Phase};
use crate::order::check_placement;

/// Visibility enhancement stage.
///
/// # Examples
///
/// ```
/// use argus_core::{Stage, Team};
/// use argus_test_utils::SyntheticEnvironment;
/// use argus_wrappers::EnhancedObservation;
///
/// let env = SyntheticEnvironment::new(3, 2, 1, 7).unwrap();
/// let mut stage = EnhancedObservation::new(env, Team::Both).unwrap();
/// let obs = stage.observe().unwrap();
/// assert_eq!(obs.camera.dim(), (3, 57));
/// assert_eq!(stage.to_string(), "<EnhancedObservation(team=both)<SyntheticEnvironment(3c/2t/1o)>>");
/// ```
#[derive(Debug)]
pub struct EnhancedObservation<S> {
    inner: S,
    team: Team,
    lifecycle: Lifecycle<LayoutSet>,
}

const NAME: &str = "EnhancedObservation";

impl<S: Stage> EnhancedObservation<S> {
    /// Wrap `inner`, enhancing the rows of `team`.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::OrderViolation`] if `inner` already contains a
    ///   relative-coordinates or rescaling stage.
    /// - [`WrapperError::InvalidPopulation`] if no layout can be derived
    ///   from `inner`'s population.
    pub fn new(inner: S, team: Team) -> Result<Self, WrapperError> {
        check_placement(StageKind::VisibilityEnhancement, &inner)?;
        let layouts = LayoutSet::derive(inner.population())?;
        log::debug!(
            "{}: team={team} population={} widths camera={} target={}",
            NAME,
            layouts.population(),
            layouts.camera().width(),
            layouts.target().width(),
        );
        Ok(Self {
            inner,
            team,
            lifecycle: Lifecycle::ready(layouts),
        })
    }

    /// Like [`new`](Self::new), parsing the team from its name.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidArgument`] for an unknown team name, plus
    /// everything [`new`](Self::new) returns.
    pub fn from_name(inner: S, team: &str) -> Result<Self, WrapperError> {
        Self::new(inner, team.parse()?)
    }

    /// The enhanced team.
    pub fn team(&self) -> Team {
        self.team
    }

    /// Cached layouts, or `None` while reconfiguring.
    pub fn layouts(&self) -> Option<&LayoutSet> {
        self.lifecycle.derived()
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// The wrapped stage.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// The wrapped stage, mutably.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Per-warehouse AND over all targets of `remaining == 0`.
///
/// With no targets every warehouse counts as empty.
///
/// # Panics
///
/// If `remaining` has fewer than [`NUM_WAREHOUSES`] columns.
pub fn fleet_empty_bits(remaining: ArrayView2<'_, u32>) -> [bool; NUM_WAREHOUSES] {
    std::array::from_fn(|w| remaining.column(w).iter().all(|&c| c == 0))
}

/// Append a visible flag to each row and flatten.
fn flagged(states: ArrayView2<'_, f64>) -> Array1<f64> {
    let (rows, cols) = states.dim();
    let stride = cols + MASK_DIM;
    let mut out = Array1::ones(rows * stride);
    for (i, row) in states.outer_iter().enumerate() {
        out.slice_mut(s![i * stride..i * stride + cols]).assign(&row);
    }
    out
}

/// Public states of every agent of `kind`, read from their own rows.
fn public_states(rows: &Array2<f64>, layouts: &LayoutSet, kind: AgentKind) -> Array1<f64> {
    let own = layouts.layout(kind).field(FieldName::OwnState).start;
    flagged(rows.slice(s![.., own..own + kind.public_dim()]))
}

fn check_view<T>(
    what: &'static str,
    view: &ArrayView2<'_, T>,
    expected: (usize, usize),
) -> Result<(), WrapperError> {
    let actual = view.dim();
    if actual == expected {
        Ok(())
    } else {
        Err(WrapperError::ShapeMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Overwrite `slice` of every row with `values`.
fn broadcast(rows: &mut Array2<f64>, slice: FieldSlice, values: &Array1<f64>) {
    rows.slice_mut(s![.., slice.range()]).assign(values);
}

impl<S: Stage> Stage for EnhancedObservation<S> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> StageKind {
        StageKind::VisibilityEnhancement
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
        let previous = self.lifecycle.derived().map(LayoutSet::population);
        let inner = &mut self.inner;
        self.lifecycle.reconfigure(NAME, || {
            inner.reload_config(payload)?;
            Ok(LayoutSet::derive(inner.population())?)
        })?;

        let current = self.inner.population();
        if previous != Some(current) {
            log::info!("{}: population now {current}", NAME);
        }
        Ok(())
    }

    fn transform(
        &mut self,
        mut observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        let layouts = self.lifecycle.current(NAME, "transform")?;
        if self.team.is_none() {
            return Ok(observation);
        }

        let population = layouts.population();
        observation.check_shape(AgentKind::Camera, layouts.camera().shape())?;
        observation.check_shape(AgentKind::Target, layouts.target().shape())?;
        let cargoes = self.inner.remaining_cargoes();
        check_view(
            "remaining cargoes",
            &cargoes,
            (population.num_targets(), NUM_WAREHOUSES),
        )?;
        let obstacles = self.inner.obstacle_states();
        check_view(
            "obstacle states",
            &obstacles,
            (population.num_obstacles(), OBSTACLE_STATE_DIM),
        )?;

        let cameras = public_states(&observation.camera, layouts, AgentKind::Camera);
        let targets = public_states(&observation.target, layouts, AgentKind::Target);
        let obstacles = flagged(obstacles);

        if self.team.covers(AgentKind::Camera) {
            let layout = layouts.camera();
            for (name, values) in [
                (FieldName::OpponentStatesWithMask, &targets),
                (FieldName::ObstacleStatesWithMask, &obstacles),
                (FieldName::TeammateStatesWithMask, &cameras),
            ] {
                broadcast(&mut observation.camera, layout.field(name), values);
            }
        }

        if self.team.covers(AgentKind::Target) {
            let bits: Array1<f64> = fleet_empty_bits(cargoes)
                .iter()
                .map(|&empty| if empty { 1.0 } else { 0.0 })
                .collect();
            let layout = layouts.target();
            for (name, values) in [
                (FieldName::WarehouseEmptyBits, &bits),
                (FieldName::OpponentStatesWithMask, &cameras),
                (FieldName::ObstacleStatesWithMask, &obstacles),
                (FieldName::TeammateStatesWithMask, &targets),
            ] {
                broadcast(&mut observation.target, layout.field(name), values);
            }
        }

        Ok(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        self.lifecycle.current(NAME, "observe")?;
        let observation = self.inner.observe()?;
        self.transform(observation)
    }
}

impl<S: fmt::Display> fmt::Display for EnhancedObservation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{NAME}(team={}){}>", self.team, self.inner)
    }
}
