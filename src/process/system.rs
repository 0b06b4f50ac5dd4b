//! Production probe and terminator backed by the live process table.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sysinfo::System;
use tracing::{debug, info, warn};

use crate::models::account::GameKind;
use crate::models::status::GameStatus;
use crate::process::markers::{self, RIOT_CLIENT_MARKERS};
use crate::process::{ProcessProbe, ProcessTerminator};
use crate::{AppError, Result};

/// Upper bound for one process-table scan. A probe that cannot answer in
/// this window reports unknown instead of stalling the orchestration.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for issuing one batch of termination signals.
const TERMINATE_TIMEOUT: Duration = Duration::from_secs(3);

/// Collect the names of every process currently in the table.
///
/// Synchronous and comparatively heavy; always called on the blocking
/// pool.
fn collect_process_names() -> Vec<String> {
    let system = System::new_all();
    system
        .processes()
        .values()
        .map(|process| process.name().to_string_lossy().into_owned())
        .collect()
}

async fn snapshot_names(context: &'static str) -> Result<Vec<String>> {
    let scan = tokio::task::spawn_blocking(collect_process_names);
    let names = tokio::time::timeout(PROBE_TIMEOUT, scan)
        .await
        .map_err(|_| AppError::StatusUnavailable(format!("{context}: process scan timed out")))?
        .map_err(|err| AppError::StatusUnavailable(format!("{context}: scan task failed: {err}")))?;
    Ok(names)
}

/// [`ProcessProbe`] over the live process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl SystemProbe {
    /// Construct the probe.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProcessProbe for SystemProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<GameStatus>> + Send + '_>> {
        Box::pin(async {
            let names = snapshot_names("probe").await?;
            let status = markers::status_from_names(&names);
            debug!(
                league = status.league_running,
                valorant = status.valorant_running,
                "process status probed"
            );
            Ok(status)
        })
    }

    fn client_running(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        Box::pin(async {
            let names = snapshot_names("client probe").await?;
            Ok(markers::client_in_names(&names))
        })
    }
}

/// [`ProcessTerminator`] over the live process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTerminator;

impl SystemTerminator {
    /// Construct the terminator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Signal every process matching the kind's markers plus the shared
/// client shim. Returns `(signalled, refused)` counts.
fn signal_kind(kind: GameKind) -> (usize, usize) {
    let kind_markers = markers::markers_for(kind);
    let system = System::new_all();
    let mut signalled = 0_usize;
    let mut refused = 0_usize;

    for process in system.processes().values() {
        let name = process.name().to_string_lossy();
        let matched = markers::name_matches(&name, kind_markers)
            || markers::name_matches(&name, RIOT_CLIENT_MARKERS);
        if !matched {
            continue;
        }

        if process.kill() {
            info!(process = %name, pid = %process.pid(), "termination requested");
            signalled += 1;
        } else {
            warn!(process = %name, pid = %process.pid(), "termination signal refused");
            refused += 1;
        }
    }

    (signalled, refused)
}

impl ProcessTerminator for SystemTerminator {
    fn request_close(
        &self,
        kind: GameKind,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let signal = tokio::task::spawn_blocking(move || signal_kind(kind));
            let (signalled, refused) = tokio::time::timeout(TERMINATE_TIMEOUT, signal)
                .await
                .map_err(|_| {
                    AppError::Termination(format!("signalling {kind} processes timed out"))
                })?
                .map_err(|err| {
                    AppError::Termination(format!("signal task for {kind} failed: {err}"))
                })?;

            if signalled == 0 && refused == 0 {
                // Nothing matched: the kind was already gone.
                debug!(%kind, "no matching processes to close");
            }
            if refused > 0 {
                return Err(AppError::Termination(format!(
                    "{refused} {kind} process(es) refused the termination signal"
                )));
            }
            Ok(())
        })
    }
}
