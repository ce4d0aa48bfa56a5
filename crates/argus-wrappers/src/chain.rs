//! Chain configuration and canonical assembly.

use argus_core::{ConfigPayload, Stage, StageKind, Team, WrapperError};

use crate::enhanced::EnhancedObservation;
use crate::order::validate_chain;
use crate::relative::RelativeCoordinates;
use crate::rescaled::RescaledObservation;

/// Which stages to stack on a base environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    /// Team to enhance; [`Team::None`] omits the stage.
    pub enhanced_observation: Team,
    /// Whether to convert to observer-relative coordinates.
    pub relative_coordinates: bool,
    /// Whether to rescale into a normalized range.
    pub rescaled_observation: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            enhanced_observation: Team::None,
            relative_coordinates: true,
            rescaled_observation: true,
        }
    }
}

impl ChainConfig {
    /// Read the chain keys from `payload`, defaulting the missing ones.
    ///
    /// `"none"` disables enhancement in any letter case; other team names
    /// must be lowercase.
    ///
    /// # Errors
    ///
    /// [`WrapperError::InvalidArgument`] for a key of the wrong type or an
    /// unknown team name.
    pub fn from_payload(payload: &ConfigPayload) -> Result<Self, WrapperError> {
        let defaults = Self::default();
        Ok(Self {
            enhanced_observation: match payload.get_str("enhanced_observation")? {
                Some(team) if team.eq_ignore_ascii_case("none") => Team::None,
                Some(team) => team.parse()?,
                None => defaults.enhanced_observation,
            },
            relative_coordinates: payload
                .get_bool("relative_coordinates")?
                .unwrap_or(defaults.relative_coordinates),
            rescaled_observation: payload
                .get_bool("rescaled_observation")?
                .unwrap_or(defaults.rescaled_observation),
        })
    }

    /// Kinds of the chain this config builds, innermost first.
    pub fn kinds(&self) -> Vec<StageKind> {
        let mut kinds = vec![StageKind::Environment];
        if !self.enhanced_observation.is_none() {
            kinds.push(StageKind::VisibilityEnhancement);
        }
        if self.relative_coordinates {
            kinds.push(StageKind::RelativeCoordinates);
        }
        if self.rescaled_observation {
            kinds.push(StageKind::RescaledObservation);
        }
        kinds
    }
}

/// Stack the configured stages on `base` in canonical order.
///
/// # Errors
///
/// Whatever a stage constructor returns, typically
/// [`WrapperError::OrderViolation`] if `base` already contains a
/// downstream kind.
pub fn build_chain<S: Stage + 'static>(
    base: S,
    config: &ChainConfig,
) -> Result<Box<dyn Stage>, WrapperError> {
    debug_assert!(validate_chain(&config.kinds()).is_ok());

    let mut stage: Box<dyn Stage> = Box::new(base);
    if !config.enhanced_observation.is_none() {
        stage = Box::new(EnhancedObservation::new(stage, config.enhanced_observation)?);
    }
    if config.relative_coordinates {
        stage = Box::new(RelativeCoordinates::new(stage)?);
    }
    if config.rescaled_observation {
        stage = Box::new(RescaledObservation::new(stage)?);
    }
    log::debug!("built chain {stage}");
    Ok(stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_enhancement() {
        assert_eq!(
            ChainConfig::default().kinds(),
            vec![
                StageKind::Environment,
                StageKind::RelativeCoordinates,
                StageKind::RescaledObservation,
            ]
        );
    }

    #[test]
    fn payload_overrides_defaults() {
        let payload = ConfigPayload::new()
            .with("enhanced_observation", "target")
            .with("rescaled_observation", false);
        let config = ChainConfig::from_payload(&payload).unwrap();
        assert_eq!(config.enhanced_observation, Team::Target);
        assert!(config.relative_coordinates);
        assert!(!config.rescaled_observation);
    }

    #[test]
    fn unknown_team_is_rejected() {
        let payload = ConfigPayload::new().with("enhanced_observation", "all");
        assert!(matches!(
            ChainConfig::from_payload(&payload),
            Err(WrapperError::InvalidArgument { argument: "team", .. })
        ));
    }

    #[test]
    fn none_disables_enhancement_in_any_case() {
        for name in ["none", "None", "NONE"] {
            let payload = ConfigPayload::new().with("enhanced_observation", name);
            let config = ChainConfig::from_payload(&payload).unwrap();
            assert_eq!(config.enhanced_observation, Team::None, "{name}");
            assert!(!config.kinds().contains(&StageKind::VisibilityEnhancement));
        }
    }

    #[test]
    fn mistyped_flag_is_rejected() {
        let payload = ConfigPayload::new().with("relative_coordinates", 1i64);
        assert!(matches!(
            ChainConfig::from_payload(&payload),
            Err(WrapperError::InvalidArgument {
                argument: "relative_coordinates",
                ..
            })
        ));
    }

    #[test]
    fn every_config_builds_a_valid_chain() {
        for team in [Team::Both, Team::Camera, Team::Target, Team::None] {
            for relative in [false, true] {
                for rescaled in [false, true] {
                    let config = ChainConfig {
                        enhanced_observation: team,
                        relative_coordinates: relative,
                        rescaled_observation: rescaled,
                    };
                    assert!(validate_chain(&config.kinds()).is_ok());
                }
            }
        }
    }
}
