//! The [`Population`] triple that drives every row layout.

use std::fmt;

use crate::error::PopulationError;

/// Counts of cameras, targets and obstacles in the current episode.
///
/// Always replaced as a whole. A reconfiguration either swaps in a new
/// `Population` or leaves the old one untouched.
///
/// # Examples
///
/// ```
/// use argus_core::Population;
///
/// let p = Population::new(3, 2, 1).unwrap();
/// assert_eq!(p.num_cameras(), 3);
/// assert!(Population::new(3, -1, 1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Population {
    num_cameras: usize,
    num_targets: usize,
    num_obstacles: usize,
}

impl Population {
    /// Validate signed counts reported by a collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::NegativeCount`] for the first negative count.
    pub fn new(
        num_cameras: i64,
        num_targets: i64,
        num_obstacles: i64,
    ) -> Result<Self, PopulationError> {
        Ok(Self {
            num_cameras: non_negative("num_cameras", num_cameras)?,
            num_targets: non_negative("num_targets", num_targets)?,
            num_obstacles: non_negative("num_obstacles", num_obstacles)?,
        })
    }

    /// Build from counts that are already known to be valid.
    pub const fn from_counts(num_cameras: usize, num_targets: usize, num_obstacles: usize) -> Self {
        Self {
            num_cameras,
            num_targets,
            num_obstacles,
        }
    }

    /// Number of cameras.
    pub fn num_cameras(&self) -> usize {
        self.num_cameras
    }

    /// Number of targets.
    pub fn num_targets(&self) -> usize {
        self.num_targets
    }

    /// Number of obstacles.
    pub fn num_obstacles(&self) -> usize {
        self.num_obstacles
    }

    /// Return a copy with a different target count.
    pub fn with_targets(self, num_targets: usize) -> Self {
        Self {
            num_targets,
            ..self
        }
    }
}

fn non_negative(entity: &'static str, value: i64) -> Result<usize, PopulationError> {
    usize::try_from(value).map_err(|_| PopulationError::NegativeCount { entity, value })
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}c/{}t/{}o",
            self.num_cameras, self.num_targets, self.num_obstacles
        )
    }
}
