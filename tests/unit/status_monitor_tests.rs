use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use riftswitch::models::account::GameKind;
use riftswitch::models::status::GameStatus;
use riftswitch::orchestrator::{spawn_status_monitor, FlightRegistry};
use riftswitch::process::ProcessProbe;
use riftswitch::{AppError, Result};

/// Probe returning a fixed snapshot, optionally failing every call.
struct StaticProbe {
    status: GameStatus,
    fail: AtomicBool,
    calls: AtomicU32,
}

impl StaticProbe {
    fn new(status: GameStatus) -> Self {
        Self {
            status,
            fail: AtomicBool::new(false),
            calls: AtomicU32::new(0),
        }
    }
}

impl ProcessProbe for StaticProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<GameStatus>> + Send + '_>> {
        Box::pin(async {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::StatusUnavailable("scripted failure".into()));
            }
            Ok(self.status)
        })
    }

    fn client_running(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        Box::pin(async { Ok(false) })
    }
}

const LEAGUE_UP: GameStatus = GameStatus {
    league_running: true,
    valorant_running: false,
};

#[tokio::test(start_paused = true)]
async fn publishes_snapshots_on_the_interval() {
    let probe = Arc::new(StaticProbe::new(LEAGUE_UP));
    let cancel = CancellationToken::new();
    let (mut updates, handle) = spawn_status_monitor(
        Arc::clone(&probe) as Arc<dyn ProcessProbe>,
        FlightRegistry::new(),
        Duration::from_secs(30),
        cancel.clone(),
    );

    assert!(
        !updates.borrow().any_running(),
        "initial snapshot is all idle"
    );

    tokio::time::timeout(Duration::from_secs(60), updates.changed())
        .await
        .expect("update within one interval")
        .expect("channel open");

    assert!(updates.borrow().is_running(GameKind::League));

    cancel.cancel();
    handle.await.expect("monitor task joins");
}

#[tokio::test(start_paused = true)]
async fn poll_failures_keep_the_last_snapshot() {
    let probe = Arc::new(StaticProbe::new(LEAGUE_UP));
    let cancel = CancellationToken::new();
    let (mut updates, handle) = spawn_status_monitor(
        Arc::clone(&probe) as Arc<dyn ProcessProbe>,
        FlightRegistry::new(),
        Duration::from_secs(30),
        cancel.clone(),
    );

    tokio::time::timeout(Duration::from_secs(60), updates.changed())
        .await
        .expect("first update")
        .expect("channel open");

    // Every poll from here on fails; the display just goes stale.
    probe.fail.store(true, Ordering::SeqCst);
    let stale = tokio::time::timeout(Duration::from_secs(120), updates.changed()).await;
    assert!(stale.is_err(), "failed polls must not publish");
    assert!(updates.borrow().is_running(GameKind::League));

    cancel.cancel();
    handle.await.expect("monitor task joins");
}

#[tokio::test(start_paused = true)]
async fn skips_polling_while_a_launch_is_in_flight() {
    let probe = Arc::new(StaticProbe::new(LEAGUE_UP));
    let flights = FlightRegistry::new();
    let permit = flights.acquire(GameKind::League).expect("slot free");

    let cancel = CancellationToken::new();
    let (mut updates, handle) = spawn_status_monitor(
        Arc::clone(&probe) as Arc<dyn ProcessProbe>,
        flights,
        Duration::from_secs(30),
        cancel.clone(),
    );

    let quiet = tokio::time::timeout(Duration::from_secs(120), updates.changed()).await;
    assert!(quiet.is_err(), "no publishes while the permit is held");
    assert_eq!(probe.calls.load(Ordering::SeqCst), 0, "probe never touched");

    // Releasing the permit lets the next tick poll again.
    drop(permit);
    tokio::time::timeout(Duration::from_secs(60), updates.changed())
        .await
        .expect("update after release")
        .expect("channel open");

    cancel.cancel();
    handle.await.expect("monitor task joins");
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_task() {
    let probe = Arc::new(StaticProbe::new(GameStatus::default()));
    let cancel = CancellationToken::new();
    let (updates, handle) = spawn_status_monitor(
        Arc::clone(&probe) as Arc<dyn ProcessProbe>,
        FlightRegistry::new(),
        Duration::from_secs(30),
        cancel.clone(),
    );

    cancel.cancel();
    handle.await.expect("monitor task joins");
    drop(updates);
}
