//! Observation stages for Argus multi-agent environments.
//!
//! Each stage wraps another [`Stage`](argus_core::Stage), pulls its joint
//! observation, and rewrites it:
//!
//! - [`EnhancedObservation`] grants full visibility to a team.
//! - [`RelativeCoordinates`] shifts positions into each observer's frame.
//! - [`RescaledObservation`] normalizes magnitudes.
//!
//! They must be stacked in that order. Each constructor checks what it
//! wraps with [`check_placement`], and [`validate_chain`] checks a whole
//! planned chain up front. Every stage caches its layouts in a
//! [`Lifecycle`] that is rebuilt on reload.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod chain;
pub mod enhanced;
pub mod lifecycle;
pub mod order;
pub mod relative;
pub mod rescaled;

pub use chain::{build_chain, ChainConfig};
pub use enhanced::{fleet_empty_bits, EnhancedObservation};
pub use lifecycle::{Lifecycle, Phase};
pub use order::{check_placement, is_order_sensitive, validate_chain, ChainError, Misordering};
pub use relative::RelativeCoordinates;
pub use rescaled::{column_scales, RescaledObservation};
