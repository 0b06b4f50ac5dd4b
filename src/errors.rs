//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Launch request rejected before any OS interaction was attempted.
    InvalidRequest(String),
    /// Process status could not be determined; no destructive action taken.
    StatusUnavailable(String),
    /// The OS call to signal a process could not be issued.
    Termination(String),
    /// A closed game was still observed running after the bounded
    /// confirmation polls; the user must close it manually.
    ForceCloseTimeout(String),
    /// Game client executable could not be spawned or did not appear.
    Spawn(String),
    /// Credential hand-off into the client login surface failed.
    Handoff(String),
    /// The launched game was never observed running within the
    /// verification window.
    LaunchVerifyTimeout(String),
    /// An orchestration run for the same game is already in flight.
    LaunchInProgress(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Account store read or write failure.
    Storage(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            Self::StatusUnavailable(msg) => write!(f, "status unavailable: {msg}"),
            Self::Termination(msg) => write!(f, "termination request: {msg}"),
            Self::ForceCloseTimeout(msg) => write!(f, "close timed out: {msg}"),
            Self::Spawn(msg) => write!(f, "spawn: {msg}"),
            Self::Handoff(msg) => write!(f, "credential hand-off: {msg}"),
            Self::LaunchVerifyTimeout(msg) => write!(f, "launch not verified: {msg}"),
            Self::LaunchInProgress(msg) => write!(f, "launch in progress: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Storage(msg) => write!(f, "storage: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl AppError {
    /// Whether the failure occurred before any destructive OS action and
    /// is therefore safe to retry immediately.
    #[must_use]
    pub fn is_retry_safe(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::StatusUnavailable(_) | Self::LaunchInProgress(_)
        )
    }
}
