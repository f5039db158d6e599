//! Shared exploration session
//!
//! A [`Session`] serializes dispatches while readers keep taking snapshots.

use crate::action::Action;
use crate::state::{ExploreConfig, ExploreState};
use insightx_core::Result;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::sync::Arc;
use tracing::warn;

/// Holds the current snapshot of an exploration
///
/// Readers get a cheap `Arc` of the snapshot. `dispatch` reduces under an
/// upgradable read, so concurrent dispatches apply one after another while
/// readers are never blocked by a reduce. A failing action leaves the
/// current snapshot in place.
pub struct Session {
    state: RwLock<Arc<ExploreState>>,
}

impl Session {
    pub fn new(config: ExploreConfig) -> Result<Self> {
        Ok(Self {
            state: RwLock::new(Arc::new(ExploreState::new(config)?)),
        })
    }

    /// The current snapshot
    pub fn state(&self) -> Arc<ExploreState> {
        Arc::clone(&self.state.read())
    }

    /// Apply an action and publish the resulting snapshot
    pub fn dispatch(&self, action: Action) -> Result<Arc<ExploreState>> {
        let guard = self.state.upgradable_read();
        let next = match guard.reduce(action) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                warn!(error = %e, "action rejected");
                return Err(e);
            }
        };
        let mut state = RwLockUpgradableReadGuard::upgrade(guard);
        *state = Arc::clone(&next);
        Ok(next)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: RwLock::new(Arc::new(ExploreState::default())),
        }
    }
}
