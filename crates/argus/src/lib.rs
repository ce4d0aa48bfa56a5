//! Argus: composable observation pipelines for multi-agent tracking
//! environments.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Argus sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use argus::ndarray::{Array2, ArrayView2};
//! use argus::prelude::*;
//!
//! // A base environment in which nothing is ever visible.
//! struct EmptyWorld {
//!     population: Population,
//!     cargo: Array2<u32>,
//!     obstacles: Array2<f64>,
//! }
//!
//! impl std::fmt::Display for EmptyWorld {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "<EmptyWorld({})>", self.population)
//!     }
//! }
//!
//! impl Stage for EmptyWorld {
//!     fn name(&self) -> &str { "EmptyWorld" }
//!     fn kind(&self) -> StageKind { StageKind::Environment }
//!     fn inner(&self) -> Option<&dyn Stage> { None }
//!     fn population(&self) -> Population { self.population }
//!     fn remaining_cargoes(&self) -> ArrayView2<'_, u32> { self.cargo.view() }
//!     fn obstacle_states(&self) -> ArrayView2<'_, f64> { self.obstacles.view() }
//!     fn reload_config(&mut self, _: Option<&ConfigPayload>) -> Result<(), WrapperError> {
//!         Ok(())
//!     }
//!     fn transform(&mut self, obs: JointObservation) -> Result<JointObservation, WrapperError> {
//!         Ok(obs)
//!     }
//!     fn observe(&mut self) -> Result<JointObservation, WrapperError> {
//!         let layouts = LayoutSet::derive(self.population)?;
//!         Ok(JointObservation::zeros(layouts.camera().shape(), layouts.target().shape()))
//!     }
//! }
//!
//! let env = EmptyWorld {
//!     population: Population::new(2, 1, 0).unwrap(),
//!     cargo: Array2::zeros((1, 4)),
//!     obstacles: Array2::zeros((0, 3)),
//! };
//! let config = ChainConfig { enhanced_observation: Team::Both, ..ChainConfig::default() };
//! assert!(validate_chain(&config.kinds()).is_ok());
//!
//! let mut chain = build_chain(env, &config).unwrap();
//! let obs = chain.observe().unwrap();
//!
//! // Enhancement marked every teammate visible.
//! let layout = compute_camera_layout(&chain.population()).unwrap();
//! let mates = layout.field(FieldName::TeammateStatesWithMask);
//! assert_eq!(obs.camera[[0, mates.mask_column(1)]], 1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `argus-core` | constants, population, observations, the `Stage` trait, errors |
//! | [`layout`] | `argus-layout` | row layout schema and the per-stage layout cache |
//! | [`wrappers`] | `argus-wrappers` | enhancement, relative coordinates, rescaling, chain assembly |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits and errors (`argus-core`).
pub use argus_core as types;

/// Row layout schema (`argus-layout`).
///
/// [`layout::compute_camera_layout`] and [`layout::compute_target_layout`]
/// describe where every field of a row lives; [`layout::LayoutSet`] bundles
/// both for one population.
pub use argus_layout as layout;

/// Observation stages (`argus-wrappers`).
pub use argus_wrappers as wrappers;

/// The array crate observations are built on.
pub use ndarray;

/// Common imports for typical Argus usage.
pub mod prelude {
    // Core types and traits
    pub use argus_core::{
        AgentKind, ConfigPayload, ConfigValue, JointObservation, Population, Stage, StageKind, Team,
    };

    // Errors
    pub use argus_core::{PopulationError, WrapperError};

    // Layout
    pub use argus_layout::{
        compute_camera_layout, compute_target_layout, FieldName, FieldSlice, Layout, LayoutSet,
    };

    // Stages
    pub use argus_wrappers::{
        build_chain, validate_chain, ChainConfig, ChainError, EnhancedObservation, Phase,
        RelativeCoordinates, RescaledObservation,
    };
}
