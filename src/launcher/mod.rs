//! Game client launching and credential hand-off.
//!
//! Covers client path discovery, detached spawning of the Riot client,
//! the timed credential hand-off into its login surface, and bounded
//! post-launch verification.

pub mod discovery;
pub mod handoff;
pub mod spawner;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::config::StartupConfiguration;
use crate::models::account::{Account, GameKind};
use crate::Result;

pub use spawner::RiotLauncher;

/// Proof of a completed launch, handed back to the caller so it can
/// persist the account's `last_login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReceipt {
    /// Title that was launched.
    pub kind: GameKind,
    /// Moment the launch was verified.
    pub completed_at: DateTime<Utc>,
}

/// Spawns a configured client and delivers credentials into it.
pub trait GameLauncher: Send + Sync {
    /// Run the full launch pipeline for one account and title.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Spawn`](crate::AppError::Spawn) when the
    /// client executable is missing or never becomes observable,
    /// [`AppError::Handoff`](crate::AppError::Handoff) when credential
    /// delivery fails, and
    /// [`AppError::LaunchVerifyTimeout`](crate::AppError::LaunchVerifyTimeout)
    /// when the game is never observed running afterwards.
    fn launch<'a>(
        &'a self,
        account: &'a Account,
        kind: GameKind,
        config: &'a StartupConfiguration,
    ) -> Pin<Box<dyn Future<Output = Result<LaunchReceipt>> + Send + 'a>>;
}
