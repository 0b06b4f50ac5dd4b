//! Background status monitor.
//!
//! Independent of any launch run: a periodic task probes both kinds and
//! republishes the snapshot for display. Probe failures are logged and
//! swallowed — a stale indicator is acceptable, corrupting an in-flight
//! launch is not — and the poll steps aside entirely while a run holds
//! a flight permit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::status::GameStatus;
use crate::orchestrator::FlightRegistry;
use crate::process::ProcessProbe;

/// Spawn the periodic status poll.
///
/// Publishes each successful snapshot on the returned `watch` channel.
/// The receiver starts at [`GameStatus::default`] (nothing running)
/// until the first poll lands. The task polls every `interval` until
/// the `CancellationToken` fires.
#[must_use]
pub fn spawn_status_monitor(
    probe: Arc<dyn ProcessProbe>,
    flights: FlightRegistry,
    interval: Duration,
    cancel: CancellationToken,
) -> (watch::Receiver<GameStatus>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(GameStatus::default());

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("status monitor shutting down");
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }

            if flights.any_active() {
                debug!("launch in flight; skipping status poll");
                continue;
            }

            match probe.probe().await {
                Ok(status) => {
                    tx.send_replace(status);
                }
                Err(err) => {
                    warn!(%err, "status poll failed; display may be stale");
                }
            }
        }
    });

    (rx, handle)
}
