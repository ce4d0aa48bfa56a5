//! Row layout schema for Argus joint observations.
//!
//! Given a [`Population`](argus_core::Population), computes where every
//! semantic section of a camera row and a target row lives: the preserved
//! header, the agent's own state, the warehouse-empty bits (target rows),
//! and the opponent, obstacle and teammate blocks with their mask bits.
//!
//! Derivation is pure and deterministic, so stages cache the result in a
//! [`LayoutSet`] and only recompute it when the population changes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod indices;
pub mod layout;
pub mod set;

pub use field::{FieldName, FieldSlice};
pub use indices::{compute_target_indices, TargetIndices};
pub use layout::{compute_camera_layout, compute_layout, compute_target_layout, Layout, LayoutGap};
pub use set::LayoutSet;
