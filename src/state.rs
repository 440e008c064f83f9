//! Dispatch state machine
//!
//! ```text
//! Idle --start--> Dispatching --finish--> Idle
//! ```
//!
//! `start` from `Dispatching` is an internal invariant violation: navigation
//! requested by subscribers is rejected before it can reach a second pass, so
//! only a router bug can get there.

use std::cell::Cell;

/// Whether a dispatch pass is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Idle,
    Dispatching,
}

impl DispatchState {
    /// Transition `Idle -> Dispatching`
    ///
    /// # Panics
    ///
    /// Panics when a pass is already running.
    pub fn start(self) -> Self {
        match self {
            DispatchState::Idle => DispatchState::Dispatching,
            DispatchState::Dispatching => {
                panic!("dispatch pass started while another pass is in progress")
            }
        }
    }

    /// Transition `Dispatching -> Idle`
    pub fn finish(self) -> Self {
        debug_assert_eq!(self, DispatchState::Dispatching, "finish without start");
        DispatchState::Idle
    }

    pub fn is_dispatching(self) -> bool {
        self == DispatchState::Dispatching
    }
}

/// Holds the state in `Dispatching` for its lifetime
///
/// Dropping the guard finishes the pass, including when a subscriber panics.
pub(crate) struct DispatchGuard<'a> {
    state: &'a Cell<DispatchState>,
}

impl<'a> DispatchGuard<'a> {
    pub(crate) fn begin(state: &'a Cell<DispatchState>) -> Self {
        state.set(state.get().start());
        Self { state }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.state.set(self.state.get().finish());
    }
}
