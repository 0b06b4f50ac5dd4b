//! OS process observation and termination.
//!
//! The [`ProcessProbe`] and [`ProcessTerminator`] traits decouple the
//! orchestrator from the live process table so launch flows can be
//! exercised against recorded fakes. Production implementations scan
//! the system process list by executable marker.

pub mod markers;
pub mod system;

use std::future::Future;
use std::pin::Pin;

use crate::models::account::GameKind;
use crate::models::status::GameStatus;
use crate::Result;

pub use system::{SystemProbe, SystemTerminator};

/// Side-effect-free query of managed process state.
pub trait ProcessProbe: Send + Sync {
    /// Take a point-in-time snapshot of both managed kinds.
    ///
    /// Bounded: implementations must give up within a short timeout
    /// rather than hang the orchestration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StatusUnavailable`](crate::AppError::StatusUnavailable)
    /// when the OS query fails or times out. Callers must treat that as
    /// "unknown", never as "not running".
    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<GameStatus>> + Send + '_>>;

    /// Whether the shared Riot client shim process is observed running.
    ///
    /// Used by the launcher's readiness wait; not part of the
    /// [`GameStatus`] snapshot because the shim is not itself a managed
    /// game.
    ///
    /// # Errors
    ///
    /// Same contract as [`probe`](Self::probe).
    fn client_running(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>>;
}

/// Best-effort process termination requests.
///
/// A request is not a confirmation: the OS tears processes down
/// asynchronously, and "nothing was running" is a benign no-op. Callers
/// must re-probe to learn the outcome.
pub trait ProcessTerminator: Send + Sync {
    /// Ask the OS to terminate every process of the given kind, plus the
    /// shared client shim it rides on.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Termination`](crate::AppError::Termination)
    /// when the signal itself cannot be issued.
    fn request_close(&self, kind: GameKind) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
