//! Launch request inputs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::account::{Account, GameKind};
use crate::{AppError, Result};

/// One user-initiated launch action. Created per request, consumed
/// entirely within one orchestration run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Account to launch with.
    pub account: Account,
    /// Target title.
    pub kind: GameKind,
}

impl LaunchRequest {
    /// Validate the request before any OS interaction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidRequest` when the account record is
    /// unusable or its affinity excludes the target kind.
    pub fn validate(&self) -> Result<()> {
        if self.account.id.trim().is_empty() {
            return Err(AppError::InvalidRequest("account id is empty".into()));
        }
        if self.account.username.trim().is_empty() {
            return Err(AppError::InvalidRequest(format!(
                "account {} has no login username",
                self.account.id
            )));
        }
        if !self.account.game.covers(self.kind) {
            return Err(AppError::InvalidRequest(format!(
                "account {} is not set up for {}",
                self.account.id, self.kind
            )));
        }
        Ok(())
    }
}

/// Which running kinds a confirmed conflict resolution closes.
///
/// Closing only the conflicting target is the conservative default;
/// closing everything that is running is an explicit opt-in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CloseScope {
    /// Close only the kind being launched.
    #[default]
    TargetOnly,
    /// Close every managed kind observed running.
    All,
}
