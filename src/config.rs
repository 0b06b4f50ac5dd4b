//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Hard ceiling for the credential hand-off delay, in seconds. External
/// login surfaces take variable time to become interactive; anything past
/// this bound is misconfiguration, not patience.
pub const MAX_LOGIN_DELAY_SECONDS: u64 = 30;

/// Executable paths for the Riot client shim and both game installs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PathsConfig {
    /// Riot client shim executable. When empty or stale, install-registry
    /// discovery runs at launch time.
    #[serde(default)]
    pub riot_client: PathBuf,
    /// League of Legends install directory (informational; launches go
    /// through the client shim).
    #[serde(default)]
    pub league: PathBuf,
    /// Valorant install directory (informational; launches go through the
    /// client shim).
    #[serde(default)]
    pub valorant: PathBuf,
}

/// Launch behavior knobs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LaunchConfig {
    /// Seconds to wait after the client appears before typing credentials.
    #[serde(default = "default_login_delay")]
    pub login_delay_seconds: u64,
    /// Suppress the post-launch status display; graphical frontends use
    /// this to get out of the way once the game is up.
    #[serde(default)]
    pub minimize_on_launch: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            login_delay_seconds: default_login_delay(),
            minimize_on_launch: false,
        }
    }
}

/// Background status display tuning.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct MonitorConfig {
    /// Seconds between background status probes.
    #[serde(default = "default_status_poll_interval")]
    pub status_poll_interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            status_poll_interval_seconds: default_status_poll_interval(),
        }
    }
}

fn default_login_delay() -> u64 {
    5
}

fn default_status_poll_interval() -> u64 {
    30
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Directory holding the account store.
    pub data_dir: PathBuf,
    /// Executable locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Launch behavior.
    #[serde(default)]
    pub launch: LaunchConfig,
    /// Status display tuning.
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the persisted account store.
    #[must_use]
    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join("accounts.json")
    }

    /// The read-only per-run view handed to one orchestration run.
    #[must_use]
    pub fn startup(&self) -> StartupConfiguration {
        StartupConfiguration {
            riot_client_path: self.paths.riot_client.clone(),
            league_path: self.paths.league.clone(),
            valorant_path: self.paths.valorant.clone(),
            login_delay: Duration::from_secs(
                self.launch.login_delay_seconds.min(MAX_LOGIN_DELAY_SECONDS),
            ),
            minimize_on_launch: self.launch.minimize_on_launch,
        }
    }

    /// Interval between background status probes.
    #[must_use]
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.status_poll_interval_seconds)
    }

    fn validate(&mut self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("data_dir must not be empty".into()));
        }

        if self.monitor.status_poll_interval_seconds == 0 {
            return Err(AppError::Config(
                "status_poll_interval_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Immutable startup inputs for a single launch run.
///
/// A snapshot of the settings the orchestrator needs; regenerated per
/// request so a settings edit never bleeds into an in-flight run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfiguration {
    /// Riot client shim executable.
    pub riot_client_path: PathBuf,
    /// League of Legends install directory.
    pub league_path: PathBuf,
    /// Valorant install directory.
    pub valorant_path: PathBuf,
    /// Delay between client readiness and credential typing, already
    /// clamped to `[0, MAX_LOGIN_DELAY_SECONDS]`.
    pub login_delay: Duration,
    /// Suppress the post-launch status display.
    pub minimize_on_launch: bool,
}
