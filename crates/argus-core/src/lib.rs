//! Core types and traits for the Argus observation pipeline.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! fundamental abstractions shared across the workspace: fixed per-agent
//! field widths, the [`Population`] triple, the [`JointObservation`] pair,
//! stage kinds with their ordering declarations, the [`Stage`] trait,
//! configuration payloads, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod consts;
pub mod error;
pub mod observation;
pub mod population;
pub mod stage;
pub mod team;

pub use config::{ConfigPayload, ConfigValue};
pub use error::{PopulationError, WrapperError};
pub use observation::JointObservation;
pub use population::Population;
pub use stage::{lineage, Lineage, Stage, StageKind};
pub use team::{AgentKind, Team};
