//! Reusable populations and observations.
//!
//! - [`small_env`]: three cameras, two targets, one obstacle.
//! - [`cargo`]: remaining-cargo matrices from literal rows.
//! - [`noise_observation`]: correctly shaped observation filled with
//!   arbitrary values, for checking which columns a stage touches.

use argus_core::consts::NUM_WAREHOUSES;
use argus_core::{JointObservation, Population};
use argus_layout::LayoutSet;
use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::SyntheticEnvironment;

/// Seed shared by the standard fixtures.
pub const SEED: u64 = 0x5eed;

/// Three cameras, two targets, one obstacle.
pub const SMALL: Population = Population::from_counts(3, 2, 1);

pub fn small_env() -> SyntheticEnvironment {
    SyntheticEnvironment::with_population(SMALL, SEED).expect("small population is valid")
}

/// Remaining cargo with one row per target.
pub fn cargo(rows: &[[u32; NUM_WAREHOUSES]]) -> Array2<u32> {
    Array2::from_shape_fn((rows.len(), NUM_WAREHOUSES), |(t, w)| rows[t][w])
}

/// Observation of the right shape for `population`, filled with
/// values in `[-1000, 1000)` drawn from `seed`.
pub fn noise_observation(population: Population, seed: u64) -> JointObservation {
    let layouts = LayoutSet::derive(population).expect("population is valid");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut fill = |shape: (usize, usize)| {
        Array2::from_shape_fn(shape, |_| rng.random_range(-1000.0..1000.0))
    };
    let camera = fill(layouts.camera().shape());
    let target = fill(layouts.target().shape());
    JointObservation::new(camera, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_rows_become_matrix_rows() {
        let m = cargo(&[[0, 1, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(m.dim(), (2, NUM_WAREHOUSES));
        assert_eq!(m[[0, 1]], 1);
    }

    #[test]
    fn noise_matches_layout_shapes() {
        let obs = noise_observation(SMALL, 3);
        assert_eq!(obs.camera.dim(), (3, 57));
        assert_eq!(obs.target.dim(), (2, 62));
    }
}
