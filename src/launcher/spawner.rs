//! Riot client launch pipeline.
//!
//! Spawns the client shim detached, waits for its login surface, hands
//! off credentials, issues the product launch, and verifies the game
//! actually came up. The spawned clients deliberately outlive this
//! process; nothing here holds a child handle past the spawn call.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::process::Command;
use tracing::{info, info_span, warn, Instrument};

use crate::config::StartupConfiguration;
use crate::launcher::discovery;
use crate::launcher::handoff::{CredentialInjector, HandoffSequencer};
use crate::launcher::{GameLauncher, LaunchReceipt};
use crate::models::account::{Account, GameKind};
use crate::process::ProcessProbe;
use crate::{AppError, Result};

/// Interval between readiness polls for the client shim.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Attempts before giving up on the client shim appearing.
const READY_POLL_ATTEMPTS: u32 = 30;

/// Settle pause after the shim is first observed; its window exists
/// before its input loop does.
const CLIENT_SETTLE: Duration = Duration::from_secs(2);

/// Interval between post-launch verification probes.
const VERIFY_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Attempts before declaring the launch unverified.
const VERIFY_POLL_ATTEMPTS: u32 = 12;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Product selector arguments understood by the client shim.
#[must_use]
pub fn launch_product_args(kind: GameKind) -> [&'static str; 2] {
    match kind {
        GameKind::League => ["--launch-product=league_of_legends", "--launch-patchline=live"],
        GameKind::Valorant => ["--launch-product=valorant", "--launch-patchline=live"],
    }
}

/// Production [`GameLauncher`] driving the real Riot client.
pub struct RiotLauncher {
    probe: Arc<dyn ProcessProbe>,
    injector: Arc<dyn CredentialInjector>,
}

impl RiotLauncher {
    /// Construct a launcher over the given probe and injector.
    #[must_use]
    pub fn new(probe: Arc<dyn ProcessProbe>, injector: Arc<dyn CredentialInjector>) -> Self {
        Self { probe, injector }
    }

    /// Resolve the client executable: the configured path when it still
    /// exists, otherwise install-registry discovery.
    fn resolve_client_path(configured: &Path) -> Result<PathBuf> {
        if !configured.as_os_str().is_empty() && configured.exists() {
            return Ok(configured.to_path_buf());
        }

        discovery::find_riot_client().ok_or_else(|| {
            AppError::Spawn(
                "riot client executable not found; set paths.riot_client in the config".into(),
            )
        })
    }

    /// Spawn the client executable detached, with no inherited stdio.
    fn spawn_detached(path: &Path, args: &[&str]) -> Result<()> {
        let mut cmd = Command::new(path);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(target_os = "windows")]
        cmd.creation_flags(CREATE_NO_WINDOW);

        cmd.spawn()
            .map_err(|err| AppError::Spawn(format!("failed to spawn {}: {err}", path.display())))?;
        Ok(())
    }

    /// Poll until the client shim is observed, bounded. Probe failures
    /// consume an attempt; only observation ends the wait early.
    async fn wait_for_client(&self) -> Result<()> {
        for attempt in 1..=READY_POLL_ATTEMPTS {
            match self.probe.client_running().await {
                Ok(true) => {
                    info!(attempt, "riot client observed");
                    tokio::time::sleep(CLIENT_SETTLE).await;
                    return Ok(());
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(attempt, %err, "client readiness probe failed");
                }
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        Err(AppError::Spawn(format!(
            "riot client not observed after {READY_POLL_ATTEMPTS} seconds"
        )))
    }

    /// Poll until the target kind reports running, bounded.
    async fn verify_launched(&self, kind: GameKind) -> Result<()> {
        for attempt in 1..=VERIFY_POLL_ATTEMPTS {
            tokio::time::sleep(VERIFY_POLL_INTERVAL).await;
            match self.probe.probe().await {
                Ok(status) if status.is_running(kind) => {
                    info!(attempt, %kind, "game observed running");
                    return Ok(());
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(attempt, %err, "verification probe failed");
                }
            }
        }

        Err(AppError::LaunchVerifyTimeout(format!(
            "{kind} was not observed running within the verification window; \
             re-trigger the launch once the client settles"
        )))
    }

    async fn run(
        &self,
        account: &Account,
        kind: GameKind,
        config: &StartupConfiguration,
    ) -> Result<LaunchReceipt> {
        let client_path = Self::resolve_client_path(&config.riot_client_path)?;
        info!(client = %client_path.display(), "spawning riot client");
        Self::spawn_detached(&client_path, &[])?;

        self.wait_for_client().await?;

        let sequencer = HandoffSequencer::new(config.login_delay, Arc::clone(&self.injector));
        sequencer
            .hand_off(&account.username, &account.password)
            .await?;

        let product_args = launch_product_args(kind);
        info!(%kind, "issuing product launch");
        Self::spawn_detached(&client_path, &product_args)?;

        self.verify_launched(kind).await?;

        Ok(LaunchReceipt {
            kind,
            completed_at: Utc::now(),
        })
    }
}

impl GameLauncher for RiotLauncher {
    fn launch<'a>(
        &'a self,
        account: &'a Account,
        kind: GameKind,
        config: &'a StartupConfiguration,
    ) -> Pin<Box<dyn Future<Output = Result<LaunchReceipt>> + Send + 'a>> {
        let span = info_span!("launch", account = %account.id, %kind);
        Box::pin(self.run(account, kind, config).instrument(span))
    }
}
