//! Placement checks between order-sensitive stage kinds.
//!
//! Two checks share one rule. [`check_placement`] runs when a single
//! wrapper is constructed and looks at everything below it.
//! [`validate_chain`] runs over a whole planned chain before anything is
//! built and reports every violation at once.

use std::error::Error;
use std::fmt;

use argus_core::{lineage, Stage, StageKind, WrapperError};

/// Whether placing `later` outside `earlier` breaks a declared order.
///
/// True when `later` is declared to run before `earlier`, by either kind's
/// declaration.
pub fn is_order_sensitive(earlier: StageKind, later: StageKind) -> bool {
    later.must_run_before(earlier)
}

/// Check that a stage of `kind` may wrap `inner`.
///
/// Walks `inner`'s whole lineage, so a downstream kind hidden under
/// unconstrained custom stages is still found.
///
/// # Errors
///
/// [`WrapperError::OrderViolation`] naming the outermost offending kind.
pub fn check_placement(kind: StageKind, inner: &dyn Stage) -> Result<(), WrapperError> {
    match lineage(inner)
        .into_iter()
        .find(|&below| is_order_sensitive(below, kind))
    {
        Some(offending) => Err(WrapperError::OrderViolation {
            stage: kind,
            offending,
        }),
        None => Ok(()),
    }
}

// ── Chain validation ───────────────────────────────────────────────

/// One pair of kinds found in the wrong order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Misordering {
    /// The kind that must run first.
    pub stage: StageKind,
    /// Position of `stage`, innermost = 0.
    pub stage_index: usize,
    /// The kind found below it.
    pub offending: StageKind,
    /// Position of `offending`.
    pub offending_index: usize,
}

/// Errors from [`validate_chain`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    /// No kinds given.
    Empty,
    /// The base environment is missing or not innermost.
    EnvironmentNotInnermost {
        /// Position of the offending environment kind, or 0 if none.
        index: usize,
    },
    /// One or more misordered pairs.
    Misordered(Vec<Misordering>),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "chain has no stages"),
            Self::EnvironmentNotInnermost { index } => {
                write!(f, "environment must be the innermost stage, found at position {index}")
            }
            Self::Misordered(pairs) => {
                write!(f, "misordered stages: ")?;
                for (i, m) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "{} (#{}) must be applied before {} (#{})",
                        m.stage, m.stage_index, m.offending, m.offending_index
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ChainError {}

/// Validate a planned chain, innermost kind first.
///
/// Checks performed:
///
/// 1. The chain is non-empty.
/// 2. Exactly one [`StageKind::Environment`], at position 0.
/// 3. No kind sits outside a kind it must run before.
///
/// # Errors
///
/// The first failing check; misorderings are collected in full.
pub fn validate_chain(kinds: &[StageKind]) -> Result<(), ChainError> {
    if kinds.is_empty() {
        return Err(ChainError::Empty);
    }

    if kinds[0] != StageKind::Environment {
        return Err(ChainError::EnvironmentNotInnermost { index: 0 });
    }
    if let Some(index) = kinds
        .iter()
        .skip(1)
        .position(|&k| k == StageKind::Environment)
    {
        return Err(ChainError::EnvironmentNotInnermost { index: index + 1 });
    }

    let mut pairs = Vec::new();
    for (outer_index, &outer) in kinds.iter().enumerate() {
        for (inner_index, &inner) in kinds[..outer_index].iter().enumerate() {
            if is_order_sensitive(inner, outer) {
                pairs.push(Misordering {
                    stage: outer,
                    stage_index: outer_index,
                    offending: inner,
                    offending_index: inner_index,
                });
            }
        }
    }
    if pairs.is_empty() {
        Ok(())
    } else {
        Err(ChainError::Misordered(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StageKind::*;

    #[test]
    fn canonical_chain_is_valid() {
        assert!(validate_chain(&[
            Environment,
            VisibilityEnhancement,
            Custom("frame_skip"),
            RelativeCoordinates,
            RescaledObservation,
        ])
        .is_ok());
        assert!(validate_chain(&[Environment]).is_ok());
    }

    #[test]
    fn empty_chain_rejected() {
        assert_eq!(validate_chain(&[]), Err(ChainError::Empty));
    }

    #[test]
    fn environment_must_be_innermost() {
        assert_eq!(
            validate_chain(&[VisibilityEnhancement, Environment]),
            Err(ChainError::EnvironmentNotInnermost { index: 0 })
        );
        assert_eq!(
            validate_chain(&[Environment, Custom("x"), Environment]),
            Err(ChainError::EnvironmentNotInnermost { index: 2 })
        );
    }

    #[test]
    fn every_misordering_is_reported() {
        let err = validate_chain(&[
            Environment,
            RescaledObservation,
            RelativeCoordinates,
            VisibilityEnhancement,
        ])
        .unwrap_err();
        let ChainError::Misordered(pairs) = err else {
            panic!("expected misordering, got {err:?}");
        };
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&Misordering {
            stage: VisibilityEnhancement,
            stage_index: 3,
            offending: RescaledObservation,
            offending_index: 1,
        }));
        assert!(pairs.contains(&Misordering {
            stage: RelativeCoordinates,
            stage_index: 2,
            offending: RescaledObservation,
            offending_index: 1,
        }));
    }

    #[test]
    fn order_sensitivity_is_directional() {
        assert!(is_order_sensitive(RelativeCoordinates, VisibilityEnhancement));
        assert!(!is_order_sensitive(VisibilityEnhancement, RelativeCoordinates));
        assert!(!is_order_sensitive(Custom("a"), VisibilityEnhancement));
    }

    #[test]
    fn display_names_both_positions() {
        let err =
            validate_chain(&[Environment, RelativeCoordinates, VisibilityEnhancement]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "misordered stages: VisibilityEnhancement (#2) must be applied before \
             RelativeCoordinates (#1)"
        );
    }
}
