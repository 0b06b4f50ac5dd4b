//! Session launch orchestration.
//!
//! Composes the process probe, terminator, and launcher into a
//! conflict-aware launch protocol, plus the independent background
//! status monitor that feeds the running/not-running display.

pub mod launch_flow;
pub mod status_monitor;

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::models::account::GameKind;
use crate::{AppError, Result};

pub use launch_flow::{ConfirmationToken, LaunchOrchestrator, LaunchOutcome};
pub use status_monitor::spawn_status_monitor;

/// Destination for the fire-and-forget `last_login` stamp after a
/// verified launch. A failure here is logged and never fails the launch.
pub trait LastLoginSink: Send + Sync {
    /// Record the moment of the account's last successful launch.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`](crate::AppError::Storage) when the
    /// record cannot be persisted.
    fn update_last_login(
        &self,
        account_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Enforces the serialization invariant: at most one orchestrated
/// launch/close sequence in flight per [`GameKind`].
///
/// Permits release themselves on drop, so an abandoned conflict token
/// or an errored run can never wedge a kind shut.
#[derive(Debug, Clone, Default)]
pub struct FlightRegistry {
    active: Arc<Mutex<HashSet<GameKind>>>,
}

impl FlightRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the in-flight slot for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LaunchInProgress`](crate::AppError::LaunchInProgress)
    /// when a run for the same kind already holds the slot.
    pub fn acquire(&self, kind: GameKind) -> Result<FlightPermit> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| AppError::LaunchInProgress("flight registry poisoned".into()))?;

        if !active.insert(kind) {
            return Err(AppError::LaunchInProgress(format!(
                "a launch for {kind} is already in flight"
            )));
        }

        Ok(FlightPermit {
            kind,
            registry: self.clone(),
        })
    }

    /// Whether any orchestration run currently holds a slot.
    ///
    /// Conservative on lock failure: reports active so the background
    /// poll stays out of the way.
    #[must_use]
    pub fn any_active(&self) -> bool {
        self.active.lock().map_or(true, |active| !active.is_empty())
    }

    fn release(&self, kind: GameKind) {
        if let Ok(mut active) = self.active.lock() {
            active.remove(&kind);
        }
    }
}

/// Exclusive claim on one kind's launch slot for the lifetime of a run.
#[derive(Debug)]
pub struct FlightPermit {
    kind: GameKind,
    registry: FlightRegistry,
}

impl FlightPermit {
    /// The kind this permit serializes.
    #[must_use]
    pub fn kind(&self) -> GameKind {
        self.kind
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.registry.release(self.kind);
    }
}
