//! Ready / Reconfiguring state machine for stage caches.
//!
//! Every stage that derives data from the population owns a
//! [`Lifecycle`]. A reload moves it to [`Phase::Reconfiguring`], runs the
//! rebuild (forward the reload, then re-derive), and swaps the new cache in
//! only once the rebuild has fully succeeded. A failed rebuild leaves the
//! stage reconfiguring: the old cache is gone, because it describes a
//! population the wrapped stage may no longer have, and every transform is
//! rejected with [`WrapperError::InvalidState`] until a reload succeeds.

use argus_core::WrapperError;

/// Observable phase of a [`Lifecycle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Caches are valid for the current population.
    Ready,
    /// A reload is in progress or has failed.
    Reconfiguring,
}

#[derive(Debug)]
enum State<T> {
    Ready(T),
    Reconfiguring,
}

/// Owner of a stage's derived cache.
#[derive(Debug)]
pub struct Lifecycle<T> {
    state: State<T>,
}

impl<T> Lifecycle<T> {
    /// Start in [`Phase::Ready`] with an already-derived cache.
    pub fn ready(derived: T) -> Self {
        Self {
            state: State::Ready(derived),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Ready(_) => Phase::Ready,
            State::Reconfiguring => Phase::Reconfiguring,
        }
    }

    /// The cache, if ready.
    pub fn derived(&self) -> Option<&T> {
        match &self.state {
            State::Ready(derived) => Some(derived),
            State::Reconfiguring => None,
        }
    }

    /// The cache, or [`WrapperError::InvalidState`] naming `stage` and
    /// `operation` if the stage is reconfiguring.
    pub fn current(&self, stage: &str, operation: &'static str) -> Result<&T, WrapperError> {
        self.derived().ok_or_else(|| WrapperError::InvalidState {
            stage: stage.to_string(),
            operation,
        })
    }

    /// Run `rebuild` with the stage marked reconfiguring and swap its
    /// result in on success.
    ///
    /// # Errors
    ///
    /// Returns whatever `rebuild` returns; the lifecycle then stays in
    /// [`Phase::Reconfiguring`].
    pub fn reconfigure<F>(&mut self, stage: &str, rebuild: F) -> Result<(), WrapperError>
    where
        F: FnOnce() -> Result<T, WrapperError>,
    {
        self.state = State::Reconfiguring;
        match rebuild() {
            Ok(derived) => {
                self.state = State::Ready(derived);
                Ok(())
            }
            Err(e) => {
                log::warn!("{stage}: reload failed, stage left reconfiguring: {e}");
                Err(e)
            }
        }
    }
}
