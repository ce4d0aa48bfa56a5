//! The per-stage layout cache.
//!
//! A [`LayoutSet`] bundles everything a stage derives from a population:
//! both row layouts and the target anchors. It is keyed on the
//! [`Population`] alone. Per-step churn never invalidates it; only a
//! reconfiguration that changes the counts does.

use argus_core::{AgentKind, Population, PopulationError};

use crate::indices::{compute_target_indices, TargetIndices};
use crate::layout::{compute_camera_layout, compute_target_layout, Layout};

/// Layouts and anchors derived from one population.
///
/// # Examples
///
/// ```
/// use argus_core::{AgentKind, Population};
/// use argus_layout::LayoutSet;
///
/// let set = LayoutSet::derive(Population::from_counts(3, 2, 1)).unwrap();
/// assert_eq!(set.layout(AgentKind::Camera).shape(), (3, 57));
/// assert!(set.matches(&Population::from_counts(3, 2, 1)));
/// assert!(!set.matches(&Population::from_counts(3, 4, 1)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSet {
    population: Population,
    camera: Layout,
    target: Layout,
    target_indices: TargetIndices,
}

impl LayoutSet {
    /// Derive both layouts and the target anchors.
    ///
    /// # Errors
    ///
    /// Propagates [`PopulationError`] from layout derivation.
    pub fn derive(population: Population) -> Result<Self, PopulationError> {
        Ok(Self {
            population,
            camera: compute_camera_layout(&population)?,
            target: compute_target_layout(&population)?,
            target_indices: compute_target_indices(&population)?,
        })
    }

    /// Population the set was derived from.
    pub fn population(&self) -> Population {
        self.population
    }

    /// Whether the set is still valid for `population`.
    pub fn matches(&self, population: &Population) -> bool {
        self.population == *population
    }

    /// Layout of camera rows.
    pub fn camera(&self) -> &Layout {
        &self.camera
    }

    /// Layout of target rows.
    pub fn target(&self) -> &Layout {
        &self.target
    }

    /// Layout of rows owned by `kind`.
    pub fn layout(&self, kind: AgentKind) -> &Layout {
        match kind {
            AgentKind::Camera => &self.camera,
            AgentKind::Target => &self.target,
        }
    }

    /// Anchors of target rows.
    pub fn target_indices(&self) -> &TargetIndices {
        &self.target_indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let p = Population::from_counts(4, 8, 9);
        assert_eq!(LayoutSet::derive(p).unwrap(), LayoutSet::derive(p).unwrap());
    }

    #[test]
    fn layouts_carry_their_kind() {
        let set = LayoutSet::derive(Population::from_counts(2, 3, 0)).unwrap();
        assert_eq!(set.layout(AgentKind::Camera).kind(), AgentKind::Camera);
        assert_eq!(set.layout(AgentKind::Target).kind(), AgentKind::Target);
        assert_eq!(set.target().rows(), 3);
    }
}
