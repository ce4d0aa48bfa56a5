//! Synthetic environments and stage doubles for Argus development.
//!
//! Provides [`SyntheticEnvironment`], a seeded base [`Stage`] producing
//! raw joint observations with random partial visibility, and
//! [`Passthrough`], an identity wrapper that can carry any
//! [`StageKind`] tag for exercising placement checks.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::fmt;

use argus_core::consts::{
    CAMERA_STATE_DIM_PRIVATE, NUM_WAREHOUSES, OBSTACLE_STATE_DIM, TARGET_STATE_DIM_PRIVATE,
    TERRAIN_SIZE, WAREHOUSE_CENTERS_OFFSET,
};
use argus_core::{
    AgentKind, ConfigPayload, JointObservation, Population, Stage, StageKind, WrapperError,
};
use argus_layout::{FieldName, Layout, LayoutSet};
use ndarray::{s, Array1, Array2, ArrayView2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Warehouse centres, one per terrain quadrant.
pub const WAREHOUSES: [[f64; 2]; NUM_WAREHOUSES] = [
    [800.0, 800.0],
    [-800.0, 800.0],
    [-800.0, -800.0],
    [800.0, -800.0],
];

/// Population used when a payload names no counts.
pub const DEFAULT_POPULATION: Population = Population::from_counts(4, 8, 9);

/// Probability that an agent or obstacle is visible to another agent.
pub const VISIBILITY: f64 = 0.3;

/// Entity states drawn from one seed.
#[derive(Clone, Debug)]
struct World {
    population: Population,
    seed: u64,
    cameras: Array2<f64>,
    targets: Array2<f64>,
    obstacles: Array2<f64>,
    remaining_cargoes: Array2<u32>,
    layouts: LayoutSet,
}

impl World {
    fn generate(population: Population, seed: u64) -> Result<Self, WrapperError> {
        let layouts = LayoutSet::derive(population)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let coord = |rng: &mut ChaCha8Rng| rng.random_range(-TERRAIN_SIZE..TERRAIN_SIZE);

        let mut cameras = Array2::zeros((population.num_cameras(), CAMERA_STATE_DIM_PRIVATE));
        for mut c in cameras.outer_iter_mut() {
            let phi: f64 = rng.random_range(-180.0..180.0);
            c.assign(&Array1::from(vec![
                coord(&mut rng),
                coord(&mut rng),
                rng.random_range(50.0..200.0),
                phi.to_radians().cos(),
                phi.to_radians().sin(),
                rng.random_range(30.0..180.0),
                rng.random_range(200.0..500.0),
                rng.random_range(5.0..15.0),
                rng.random_range(5.0..20.0),
            ]));
        }

        let mut targets = Array2::zeros((population.num_targets(), TARGET_STATE_DIM_PRIVATE));
        let mut remaining_cargoes = Array2::zeros((population.num_targets(), NUM_WAREHOUSES));
        for (mut t, mut cargo) in targets.outer_iter_mut().zip(remaining_cargoes.outer_iter_mut()) {
            t[0] = coord(&mut rng);
            t[1] = coord(&mut rng);
            t[2] = rng.random_range(100.0..300.0);
            t[3] = if rng.random_bool(0.5) { 1.0 } else { 0.0 };
            t[4] = rng.random_range(10.0..30.0);
            t[5] = f64::from(rng.random_range(1u32..4));
            t[6 + rng.random_range(0..NUM_WAREHOUSES)] = 1.0;
            for c in cargo.iter_mut() {
                *c = rng.random_range(0u32..3);
            }
        }

        let mut obstacles = Array2::zeros((population.num_obstacles(), OBSTACLE_STATE_DIM));
        for mut o in obstacles.outer_iter_mut() {
            o[0] = coord(&mut rng);
            o[1] = coord(&mut rng);
            o[2] = rng.random_range(25.0..100.0);
        }

        Ok(Self {
            population,
            seed,
            cameras,
            targets,
            obstacles,
            remaining_cargoes,
            layouts,
        })
    }

    /// Private state of agent `i` of `kind`, including its own empty bits.
    fn private_state(&self, kind: AgentKind, i: usize) -> Array1<f64> {
        match kind {
            AgentKind::Camera => self.cameras.row(i).to_owned(),
            AgentKind::Target => {
                let mut state = self.targets.row(i).to_owned();
                let bits = TARGET_STATE_DIM_PRIVATE - NUM_WAREHOUSES;
                for (w, &c) in self.remaining_cargoes.row(i).iter().enumerate() {
                    state[bits + w] = if c == 0 { 1.0 } else { 0.0 };
                }
                state
            }
        }
    }

    fn public_states(&self, kind: AgentKind) -> ArrayView2<'_, f64> {
        match kind {
            AgentKind::Camera => self.cameras.slice(s![.., ..kind.public_dim()]),
            AgentKind::Target => self.targets.slice(s![.., ..kind.public_dim()]),
        }
    }

    fn fill_rows(&self, rows: &mut Array2<f64>, layout: &Layout, rng: &mut ChaCha8Rng) {
        let kind = layout.kind();
        let p = self.population;
        let own = layout.field(FieldName::OwnState).start;

        for (i, mut row) in rows.outer_iter_mut().enumerate() {
            row[0] = p.num_cameras() as f64;
            row[1] = p.num_targets() as f64;
            row[2] = p.num_obstacles() as f64;
            row[3] = match kind {
                AgentKind::Camera => 0.0,
                AgentKind::Target => 1.0,
            };
            row[4] = i as f64;
            for (w, centre) in WAREHOUSES.iter().enumerate() {
                row[WAREHOUSE_CENTERS_OFFSET + 2 * w] = centre[0];
                row[WAREHOUSE_CENTERS_OFFSET + 2 * w + 1] = centre[1];
            }

            let state = self.private_state(kind, i);
            row.slice_mut(s![own..own + state.len()]).assign(&state);

            let blocks = [
                (FieldName::OpponentStatesWithMask, self.public_states(kind.opponent()), None),
                (FieldName::ObstacleStatesWithMask, self.obstacles.view(), None),
                (FieldName::TeammateStatesWithMask, self.public_states(kind), Some(i)),
            ];
            for (name, states, observer) in blocks {
                let slice = layout.field(name);
                for (j, entity) in states.outer_iter().enumerate() {
                    if observer == Some(j) || rng.random_bool(VISIBILITY) {
                        let entry = slice.entry(j);
                        row.slice_mut(s![entry.start..entry.start + entity.len()])
                            .assign(&entity);
                        row[slice.mask_column(j)] = 1.0;
                    }
                }
            }
        }
    }
}

/// Seeded base environment.
///
/// Entity states are drawn once per (population, seed). Each call to
/// [`observe`](Stage::observe) draws fresh visibility masks from a
/// stream that is also seeded, so two environments built alike produce
/// identical observation sequences. Agents always see themselves;
/// masked-out entries are zero.
#[derive(Clone, Debug)]
pub struct SyntheticEnvironment {
    world: World,
    rng: ChaCha8Rng,
}

impl SyntheticEnvironment {
    pub const NAME: &'static str = "SyntheticEnvironment";

    /// Build from signed counts, as an external caller would supply them.
    pub fn new(
        num_cameras: i64,
        num_targets: i64,
        num_obstacles: i64,
        seed: u64,
    ) -> Result<Self, WrapperError> {
        let population = Population::new(num_cameras, num_targets, num_obstacles)?;
        Self::with_population(population, seed)
    }

    pub fn with_population(population: Population, seed: u64) -> Result<Self, WrapperError> {
        Ok(Self {
            world: World::generate(population, seed)?,
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        })
    }

    /// Build from a payload, defaulting to [`DEFAULT_POPULATION`] and seed 0.
    pub fn from_payload(payload: &ConfigPayload) -> Result<Self, WrapperError> {
        let (population, seed) = read_payload(payload, DEFAULT_POPULATION, 0)?;
        Self::with_population(population, seed)
    }

    pub fn seed(&self) -> u64 {
        self.world.seed
    }

    /// Private camera states, `num_cameras × CAMERA_STATE_DIM_PRIVATE`.
    pub fn camera_states(&self) -> ArrayView2<'_, f64> {
        self.world.cameras.view()
    }

    /// Private target states without the empty bits filled in.
    pub fn target_states(&self) -> ArrayView2<'_, f64> {
        self.world.targets.view()
    }

    /// Replace the remaining cargo. The shape is not checked.
    pub fn set_remaining_cargoes(&mut self, remaining: Array2<u32>) {
        self.world.remaining_cargoes = remaining;
    }

    /// Replace the obstacle states. The shape is not checked.
    pub fn set_obstacle_states(&mut self, states: Array2<f64>) {
        self.world.obstacles = states;
    }
}

fn read_payload(
    payload: &ConfigPayload,
    current: Population,
    seed: u64,
) -> Result<(Population, u64), WrapperError> {
    let count = |key: &'static str, fallback: usize| -> Result<i64, WrapperError> {
        Ok(payload.get_int(key)?.unwrap_or(fallback as i64))
    };
    let population = Population::new(
        count("num_cameras", current.num_cameras())?,
        count("num_targets", current.num_targets())?,
        count("num_obstacles", current.num_obstacles())?,
    )?;
    let seed = match payload.get_int("seed")? {
        Some(s) => u64::try_from(s).map_err(|_| WrapperError::InvalidArgument {
            argument: "seed",
            value: s.to_string(),
            expected: "a non-negative integer".to_string(),
        })?,
        None => seed,
    };
    Ok((population, seed))
}

impl Stage for SyntheticEnvironment {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> StageKind {
        StageKind::Environment
    }

    fn inner(&self) -> Option<&dyn Stage> {
        None
    }

    fn population(&self) -> Population {
        self.world.population
    }

    fn remaining_cargoes(&self) -> ArrayView2<'_, u32> {
        self.world.remaining_cargoes.view()
    }

    fn obstacle_states(&self) -> ArrayView2<'_, f64> {
        self.world.obstacles.view()
    }

    /// Regenerate the world. `None` resets it with the current counts and seed.
    fn reload_config(&mut self, payload: Option<&ConfigPayload>) -> Result<(), WrapperError> {
        let (population, seed) = match payload {
            Some(payload) => read_payload(payload, self.world.population, self.world.seed)?,
            None => (self.world.population, self.world.seed),
        };
        *self = Self::with_population(population, seed)?;
        Ok(())
    }

    fn transform(
        &mut self,
        observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        Ok(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        let layouts = &self.world.layouts;
        let mut observation =
            JointObservation::zeros(layouts.camera().shape(), layouts.target().shape());
        self.world
            .fill_rows(&mut observation.camera, layouts.camera(), &mut self.rng);
        self.world
            .fill_rows(&mut observation.target, layouts.target(), &mut self.rng);
        Ok(observation)
    }
}

impl fmt::Display for SyntheticEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}({})>", Self::NAME, self.world.population)
    }
}

/// Identity wrapper carrying an arbitrary kind tag.
#[derive(Debug)]
pub struct Passthrough<S> {
    inner: S,
    kind: StageKind,
    reloads: usize,
}

impl<S: Stage> Passthrough<S> {
    /// Untagged wrapper, [`StageKind::Custom`]`("passthrough")`.
    pub fn new(inner: S) -> Self {
        Self::with_kind(inner, StageKind::Custom("passthrough"))
    }

    /// Wrapper that claims to be `kind`.
    pub fn with_kind(inner: S, kind: StageKind) -> Self {
        Self {
            inner,
            kind,
            reloads: 0,
        }
    }

    /// Number of reloads forwarded.
    pub fn reloads(&self) -> usize {
        self.reloads
    }
}

impl<S: Stage> Stage for Passthrough<S> {
    fn name(&self) -> &str {
        "Passthrough"
    }

    fn kind(&self) -> StageKind {
        self.kind
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
        self.reloads += 1;
        self.inner.reload_config(payload)
    }

    fn transform(
        &mut self,
        observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        Ok(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        let observation = self.inner.observe()?;
        self.transform(observation)
    }
}

impl<S: fmt::Display> fmt::Display for Passthrough<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Passthrough({}){}>", self.kind, self.inner)
    }
}
