//! Benchmark profiles for the Argus observation pipeline.
//!
//! - [`REFERENCE`]: the default 4-camera, 8-target, 9-obstacle scenario
//! - [`STRESS`]: a large population for stressing broadcast writes
//! - [`reference_chain`]: the full canonical chain over a synthetic environment

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use argus_core::{Population, Stage, Team, WrapperError};
use argus_test_utils::SyntheticEnvironment;
use argus_wrappers::{build_chain, ChainConfig};

/// Default scenario population.
pub const REFERENCE: Population = Population::from_counts(4, 8, 9);

/// Large population, roughly 10x the reference row width.
pub const STRESS: Population = Population::from_counts(32, 64, 48);

/// Enhancement, relative coordinates and rescaling over a seeded environment.
pub fn reference_chain(population: Population, seed: u64) -> Result<Box<dyn Stage>, WrapperError> {
    let env = SyntheticEnvironment::with_population(population, seed)?;
    let config = ChainConfig {
        enhanced_observation: Team::Both,
        ..ChainConfig::default()
    };
    build_chain(env, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_build() {
        for p in [REFERENCE, STRESS] {
            let mut chain = reference_chain(p, 1).unwrap();
            assert_eq!(chain.observe().unwrap().camera.nrows(), p.num_cameras());
        }
    }
}
