//! The [`JointObservation`] pair flowing through a stage chain.
//!
//! # Ownership model
//!
//! A `JointObservation` is produced once per step by the base environment
//! and moved through the chain by value. Each stage takes ownership,
//! rewrites its slices in place, and returns it to the caller. Since the
//! value is moved, no stage can keep an alias to data it has forwarded.

use ndarray::Array2;

use crate::error::WrapperError;
use crate::team::AgentKind;

/// One row per camera and one row per target.
#[derive(Clone, Debug, PartialEq)]
pub struct JointObservation {
    /// `num_cameras × camera_width`.
    pub camera: Array2<f64>,
    /// `num_targets × target_width`.
    pub target: Array2<f64>,
}

impl JointObservation {
    /// Pair up camera and target matrices.
    pub fn new(camera: Array2<f64>, target: Array2<f64>) -> Self {
        Self { camera, target }
    }

    /// All-zero observation with the given `(rows, cols)` shapes.
    pub fn zeros(camera_shape: (usize, usize), target_shape: (usize, usize)) -> Self {
        Self {
            camera: Array2::zeros(camera_shape),
            target: Array2::zeros(target_shape),
        }
    }

    /// Rows owned by `kind`.
    pub fn rows(&self, kind: AgentKind) -> &Array2<f64> {
        match kind {
            AgentKind::Camera => &self.camera,
            AgentKind::Target => &self.target,
        }
    }

    /// Mutable rows owned by `kind`.
    pub fn rows_mut(&mut self, kind: AgentKind) -> &mut Array2<f64> {
        match kind {
            AgentKind::Camera => &mut self.camera,
            AgentKind::Target => &mut self.target,
        }
    }

    /// Split into `(camera, target)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.camera, self.target)
    }

    /// Check that the rows owned by `kind` have shape `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::ShapeMismatch`] on any difference.
    pub fn check_shape(
        &self,
        kind: AgentKind,
        expected: (usize, usize),
    ) -> Result<(), WrapperError> {
        let actual = self.rows(kind).dim();
        if actual == expected {
            Ok(())
        } else {
            Err(WrapperError::ShapeMismatch {
                what: match kind {
                    AgentKind::Camera => "camera rows",
                    AgentKind::Target => "target rows",
                },
                expected,
                actual,
            })
        }
    }
}
