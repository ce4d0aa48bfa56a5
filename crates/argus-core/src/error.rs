//! Error types for the Argus observation pipeline.
//!
//! Two subsystems report errors: population/layout derivation
//! ([`PopulationError`]) and stage construction, reconfiguration and
//! transformation ([`WrapperError`]). Every kind is unrecoverable locally
//! and is returned to the caller as-is.

use std::error::Error;
use std::fmt;

use crate::stage::StageKind;

/// Errors from population validation and layout derivation.
///
/// Both variants are the "invalid population" kind: they indicate a
/// collaborator handed over counts that cannot describe a row layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopulationError {
    /// A population count was negative.
    NegativeCount {
        /// Which count (`"num_cameras"`, `"num_targets"`, `"num_obstacles"`).
        entity: &'static str,
        /// The offending value.
        value: i64,
    },
    /// A row width does not fit in `usize`.
    WidthOverflow {
        /// Cameras in the offending population.
        num_cameras: usize,
        /// Targets in the offending population.
        num_targets: usize,
        /// Obstacles in the offending population.
        num_obstacles: usize,
    },
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCount { entity, value } => {
                write!(f, "{entity} must be non-negative, got {value}")
            }
            Self::WidthOverflow {
                num_cameras,
                num_targets,
                num_obstacles,
            } => write!(
                f,
                "row width overflows usize for population \
                 ({num_cameras} cameras, {num_targets} targets, {num_obstacles} obstacles)"
            ),
        }
    }
}

impl Error for PopulationError {}

/// Errors from stage construction, reconfiguration, and transformation.
#[derive(Clone, Debug, PartialEq)]
pub enum WrapperError {
    /// An argument is outside its enumerated set or has the wrong type.
    InvalidArgument {
        /// Name of the argument or payload key.
        argument: &'static str,
        /// The rejected value, rendered for diagnostics.
        value: String,
        /// What was expected instead.
        expected: String,
    },
    /// The stage was stacked on top of a kind it must run before.
    ///
    /// Raised at construction only, never from `transform()`.
    OrderViolation {
        /// The stage being constructed.
        stage: StageKind,
        /// The downstream kind found below it in the chain.
        offending: StageKind,
    },
    /// The wrapped stage reported an unusable population.
    InvalidPopulation(PopulationError),
    /// An operation was attempted while the stage was reconfiguring.
    InvalidState {
        /// Name of the stage.
        stage: String,
        /// The rejected operation.
        operation: &'static str,
    },
    /// An input matrix does not have the shape the cached layout requires.
    ///
    /// Detected before any slice is written.
    ShapeMismatch {
        /// Which matrix was rejected.
        what: &'static str,
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        actual: (usize, usize),
    },
}

impl fmt::Display for WrapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument {
                argument,
                value,
                expected,
            } => write!(
                f,
                "invalid argument {argument} = {value:?}, expected {expected}"
            ),
            Self::OrderViolation { stage, offending } => write!(
                f,
                "{stage} must be applied before {offending}; check the wrapper order"
            ),
            Self::InvalidPopulation(e) => write!(f, "invalid population: {e}"),
            Self::InvalidState { stage, operation } => {
                write!(f, "{operation} called on '{stage}' while reconfiguring")
            }
            Self::ShapeMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what} has shape {actual:?}, expected {expected:?}"
            ),
        }
    }
}

impl Error for WrapperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPopulation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PopulationError> for WrapperError {
    fn from(e: PopulationError) -> Self {
        Self::InvalidPopulation(e)
    }
}
