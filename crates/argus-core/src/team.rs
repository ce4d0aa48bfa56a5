//! Agent kinds and the team selector.

use std::fmt;
use std::str::FromStr;

use crate::consts::{
    CAMERA_STATE_DIM_PRIVATE, CAMERA_STATE_DIM_PUBLIC, TARGET_STATE_DIM_PRIVATE,
    TARGET_STATE_DIM_PUBLIC,
};
use crate::error::WrapperError;

/// The two agent populations that own observation rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Camera rows.
    Camera,
    /// Target rows.
    Target,
}

impl AgentKind {
    /// Width of the state other agents can see.
    pub const fn public_dim(self) -> usize {
        match self {
            Self::Camera => CAMERA_STATE_DIM_PUBLIC,
            Self::Target => TARGET_STATE_DIM_PUBLIC,
        }
    }

    /// Width of the full state an agent sees of itself.
    pub const fn private_dim(self) -> usize {
        match self {
            Self::Camera => CAMERA_STATE_DIM_PRIVATE,
            Self::Target => TARGET_STATE_DIM_PRIVATE,
        }
    }

    /// The other team.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Camera => Self::Target,
            Self::Target => Self::Camera,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Which team's observations a stage rewrites.
///
/// # Examples
///
/// ```
/// use argus_core::{AgentKind, Team};
///
/// let team: Team = "camera".parse().unwrap();
/// assert!(team.covers(AgentKind::Camera));
/// assert!(!team.covers(AgentKind::Target));
/// assert!("cameras".parse::<Team>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Team {
    /// Camera and target rows.
    #[default]
    Both,
    /// Camera rows only.
    Camera,
    /// Target rows only.
    Target,
    /// No rows; the stage is an identity.
    None,
}

impl Team {
    /// Accepted spellings, in declaration order.
    pub const VARIANTS: [&'static str; 4] = ["both", "camera", "target", "none"];

    /// Canonical spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Camera => "camera",
            Self::Target => "target",
            Self::None => "none",
        }
    }

    /// Whether rows of `kind` are selected.
    pub const fn covers(self, kind: AgentKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _) | (Self::Camera, AgentKind::Camera) | (Self::Target, AgentKind::Target)
        )
    }

    /// Whether no rows are selected.
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl FromStr for Team {
    type Err = WrapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Self::Both),
            "camera" => Ok(Self::Camera),
            "target" => Ok(Self::Target),
            "none" => Ok(Self::None),
            other => Err(WrapperError::InvalidArgument {
                argument: "team",
                value: other.to_string(),
                expected: format!("one of {:?}", Self::VARIANTS),
            }),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
