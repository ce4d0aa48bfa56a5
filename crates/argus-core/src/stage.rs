//! The [`Stage`] trait and the ordering declarations between stage kinds.
//!
//! A chain is built from the base environment outwards: every wrapper
//! owns the stage it wraps. Some kinds are order-sensitive. A stage that
//! expects raw, absolute, unscaled values must sit *below* the stages
//! that relativize or rescale them. Each kind declares those constraints
//! as immutable metadata ([`StageKind::must_precede`] and
//! [`StageKind::must_follow`]) rather than inspecting concrete types.

use std::fmt;

use ndarray::ArrayView2;
use smallvec::SmallVec;

use crate::config::ConfigPayload;
use crate::error::WrapperError;
use crate::observation::JointObservation;
use crate::population::Population;

/// The kind tag carried by every stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// The base environment. Always innermost.
    Environment,
    /// Forces full visibility for a team.
    VisibilityEnhancement,
    /// Converts absolute positions into observer-relative coordinates.
    RelativeCoordinates,
    /// Rescales observation magnitudes into a normalized range.
    RescaledObservation,
    /// A stage with no ordering constraints.
    Custom(&'static str),
}

impl StageKind {
    /// Kinds that must be applied *after* (outside) this kind.
    pub const fn must_precede(self) -> &'static [StageKind] {
        match self {
            Self::VisibilityEnhancement => &[Self::RelativeCoordinates, Self::RescaledObservation],
            Self::RelativeCoordinates => &[Self::RescaledObservation],
            Self::Environment | Self::RescaledObservation | Self::Custom(_) => &[],
        }
    }

    /// Kinds that must be applied *before* (inside) this kind.
    pub const fn must_follow(self) -> &'static [StageKind] {
        match self {
            Self::RelativeCoordinates => &[Self::VisibilityEnhancement],
            Self::RescaledObservation => &[Self::VisibilityEnhancement, Self::RelativeCoordinates],
            Self::Environment | Self::VisibilityEnhancement | Self::Custom(_) => &[],
        }
    }

    /// Whether `self` is required to run before `later`, by either side's
    /// declaration.
    pub fn must_run_before(self, later: StageKind) -> bool {
        self.must_precede().contains(&later) || later.must_follow().contains(&self)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("Environment"),
            Self::VisibilityEnhancement => f.write_str("VisibilityEnhancement"),
            Self::RelativeCoordinates => f.write_str("RelativeCoordinates"),
            Self::RescaledObservation => f.write_str("RescaledObservation"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// One link of an observation chain.
///
/// # Contract
///
/// - `population`, `remaining_cargoes` and `obstacle_states` are proxied
///   from the wrapped stage unless the stage overrides them.
/// - `reload_config` forwards to the wrapped stage first, then rebuilds any
///   caches that depend on the population. It must complete before the
///   next `transform` or `observe`.
/// - `transform` takes the observation by value and returns it; a stage
///   never keeps a reference after returning.
///
/// # Object safety
///
/// This trait is object-safe; chains assembled at runtime are stored as
/// `Box<dyn Stage>`.
pub trait Stage: Send + fmt::Display {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Ordering tag of this stage.
    fn kind(&self) -> StageKind;

    /// The wrapped stage, or `None` for the base environment.
    fn inner(&self) -> Option<&dyn Stage>;

    /// Current population counts.
    fn population(&self) -> Population;

    /// Remaining cargo, `num_targets × NUM_WAREHOUSES`.
    fn remaining_cargoes(&self) -> ArrayView2<'_, u32>;

    /// Obstacle states, `num_obstacles × OBSTACLE_STATE_DIM`.
    fn obstacle_states(&self) -> ArrayView2<'_, f64>;

    /// Reload configuration, possibly changing the population.
    fn reload_config(&mut self, payload: Option<&ConfigPayload>) -> Result<(), WrapperError>;

    /// Rewrite one joint observation.
    fn transform(&mut self, observation: JointObservation)
        -> Result<JointObservation, WrapperError>;

    /// Pull an observation from the wrapped stage and transform it.
    fn observe(&mut self) -> Result<JointObservation, WrapperError>;
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> StageKind {
        (**self).kind()
    }

    fn inner(&self) -> Option<&dyn Stage> {
        (**self).inner()
    }

    fn population(&self) -> Population {
        (**self).population()
    }

    fn remaining_cargoes(&self) -> ArrayView2<'_, u32> {
        (**self).remaining_cargoes()
    }

    fn obstacle_states(&self) -> ArrayView2<'_, f64> {
        (**self).obstacle_states()
    }

    fn reload_config(&mut self, payload: Option<&ConfigPayload>) -> Result<(), WrapperError> {
        (**self).reload_config(payload)
    }

    fn transform(
        &mut self,
        observation: JointObservation,
    ) -> Result<JointObservation, WrapperError> {
        (**self).transform(observation)
    }

    fn observe(&mut self) -> Result<JointObservation, WrapperError> {
        (**self).observe()
    }
}

/// Kinds of a chain, outermost first.
pub type Lineage = SmallVec<[StageKind; 8]>;

/// Collect the kinds of `stage` and everything it wraps, outermost first.
pub fn lineage(stage: &dyn Stage) -> Lineage {
    let mut kinds = Lineage::new();
    let mut current = Some(stage);
    while let Some(s) = current {
        kinds.push(s.kind());
        current = s.inner();
    }
    kinds
}
