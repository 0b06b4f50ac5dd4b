//! Launch run lifecycle phases.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Phase of one orchestrated launch run.
///
/// A run moves `Idle → Probing → {Clean, Conflicted} → Closing →
/// ConfirmingClose → {Launching, CloseTimedOut} → Completed | Failed`.
/// Terminal phases hold no residual state; the next request starts a
/// fresh run from `Idle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPhase {
    /// No run in progress.
    Idle,
    /// Querying process status for both kinds.
    Probing,
    /// Target kind not running; launch may proceed directly.
    Clean,
    /// Target kind running; awaiting an explicit close confirmation.
    Conflicted,
    /// Termination requests being issued.
    Closing,
    /// Bounded re-probing until the closed kinds report not-running.
    ConfirmingClose,
    /// Delegating to the process launcher.
    Launching,
    /// Confirmation polls exhausted while still running.
    CloseTimedOut,
    /// Terminal: launch succeeded.
    Completed,
    /// Terminal: run failed.
    Failed,
}

impl LaunchPhase {
    /// Whether the phase is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Probing)
                | (Self::Probing, Self::Clean | Self::Conflicted | Self::Failed)
                | (Self::Clean, Self::Launching)
                | (Self::Conflicted, Self::Closing)
                | (Self::Closing, Self::ConfirmingClose | Self::Failed)
                | (Self::ConfirmingClose, Self::Launching | Self::CloseTimedOut)
                | (Self::CloseTimedOut, Self::Failed)
                | (Self::Launching, Self::Completed | Self::Failed)
        )
    }

    /// Stable lowercase identifier used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Clean => "clean",
            Self::Conflicted => "conflicted",
            Self::Closing => "closing",
            Self::ConfirmingClose => "confirming_close",
            Self::Launching => "launching",
            Self::CloseTimedOut => "close_timed_out",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Display for LaunchPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
