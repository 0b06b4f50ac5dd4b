//! Shared fakes and builders for orchestrator-level tests.
//!
//! Provides scripted probe, recording terminator/launcher/sink fakes,
//! and harness construction so individual test modules can focus on
//! behaviour rather than boilerplate.

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use riftswitch::config::StartupConfiguration;
use riftswitch::launcher::{GameLauncher, LaunchReceipt};
use riftswitch::models::account::{Account, GameAffinity, GameKind};
use riftswitch::models::status::GameStatus;
use riftswitch::orchestrator::{LastLoginSink, LaunchOrchestrator};
use riftswitch::process::{ProcessProbe, ProcessTerminator};
use riftswitch::{AppError, Result};

/// Snapshot with nothing running.
pub const ALL_IDLE: GameStatus = GameStatus {
    league_running: false,
    valorant_running: false,
};

/// Snapshot with only League running.
pub const LEAGUE_UP: GameStatus = GameStatus {
    league_running: true,
    valorant_running: false,
};

/// Snapshot with both titles running.
pub const BOTH_UP: GameStatus = GameStatus {
    league_running: true,
    valorant_running: true,
};

/// One scripted probe answer.
pub enum ProbeStep {
    /// Return this snapshot.
    Status(GameStatus),
    /// Fail with `StatusUnavailable`.
    Fail,
}

/// Probe that pops a scripted answer per call and falls back to a fixed
/// snapshot once the script runs dry.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeStep>>,
    fallback: GameStatus,
    calls: AtomicU32,
}

impl ScriptedProbe {
    pub fn always(status: GameStatus) -> Self {
        Self::with_script(status, Vec::new())
    }

    pub fn with_script(fallback: GameStatus, steps: Vec<ProbeStep>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            fallback,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `probe()` calls observed so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessProbe for ScriptedProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<GameStatus>> + Send + '_>> {
        Box::pin(async {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.lock().unwrap().pop_front();
            match step {
                Some(ProbeStep::Status(status)) => Ok(status),
                Some(ProbeStep::Fail) => {
                    Err(AppError::StatusUnavailable("scripted probe failure".into()))
                }
                None => Ok(self.fallback),
            }
        })
    }

    fn client_running(&self) -> Pin<Box<dyn Future<Output = Result<bool>> + Send + '_>> {
        Box::pin(async { Ok(true) })
    }
}

/// Terminator that records every close request.
#[derive(Default)]
pub struct FakeTerminator {
    pub closed: Mutex<Vec<GameKind>>,
    pub fail: bool,
}

impl ProcessTerminator for FakeTerminator {
    fn request_close(
        &self,
        kind: GameKind,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.closed.lock().unwrap().push(kind);
            if self.fail {
                return Err(AppError::Termination("scripted signal refusal".into()));
            }
            Ok(())
        })
    }
}

/// Launcher that records invocations; can fail or hold until released.
#[derive(Default)]
pub struct FakeLauncher {
    pub launched: Mutex<Vec<(String, GameKind)>>,
    pub fail: bool,
    /// When set, `launch` parks until the notify fires.
    pub hold: Option<Arc<Notify>>,
}

impl FakeLauncher {
    pub fn invocations(&self) -> Vec<(String, GameKind)> {
        self.launched.lock().unwrap().clone()
    }
}

impl GameLauncher for FakeLauncher {
    fn launch<'a>(
        &'a self,
        account: &'a Account,
        kind: GameKind,
        _config: &'a StartupConfiguration,
    ) -> Pin<Box<dyn Future<Output = Result<LaunchReceipt>> + Send + 'a>> {
        Box::pin(async move {
            self.launched.lock().unwrap().push((account.id.clone(), kind));
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            if self.fail {
                return Err(AppError::Spawn("scripted spawn failure".into()));
            }
            Ok(LaunchReceipt {
                kind,
                completed_at: Utc::now(),
            })
        })
    }
}

/// Sink that records every `last_login` stamp.
#[derive(Default)]
pub struct FakeSink {
    pub stamped: Mutex<Vec<(String, DateTime<Utc>)>>,
    pub fail: bool,
}

impl LastLoginSink for FakeSink {
    fn update_last_login(
        &self,
        account_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let account_id = account_id.to_owned();
        Box::pin(async move {
            self.stamped.lock().unwrap().push((account_id, timestamp));
            if self.fail {
                return Err(AppError::Storage("scripted store failure".into()));
            }
            Ok(())
        })
    }
}

/// Orchestrator wired to the fakes, with handles kept for assertions.
pub struct Harness {
    pub probe: Arc<ScriptedProbe>,
    pub terminator: Arc<FakeTerminator>,
    pub launcher: Arc<FakeLauncher>,
    pub sink: Arc<FakeSink>,
    pub orchestrator: LaunchOrchestrator,
}

pub fn harness(probe: ScriptedProbe) -> Harness {
    harness_with(probe, FakeTerminator::default(), FakeLauncher::default(), FakeSink::default())
}

pub fn harness_with(
    probe: ScriptedProbe,
    terminator: FakeTerminator,
    launcher: FakeLauncher,
    sink: FakeSink,
) -> Harness {
    let probe = Arc::new(probe);
    let terminator = Arc::new(terminator);
    let launcher = Arc::new(launcher);
    let sink = Arc::new(sink);

    let orchestrator = LaunchOrchestrator::new(
        Arc::clone(&probe) as Arc<dyn ProcessProbe>,
        Arc::clone(&terminator) as Arc<dyn ProcessTerminator>,
        Arc::clone(&launcher) as Arc<dyn GameLauncher>,
        Arc::clone(&sink) as Arc<dyn LastLoginSink>,
    );

    Harness {
        probe,
        terminator,
        launcher,
        sink,
        orchestrator,
    }
}

/// Account usable for either title.
pub fn test_account(name: &str) -> Account {
    Account::new(
        name.to_owned(),
        format!("{name}-login"),
        "hunter2".to_owned(),
        String::new(),
        GameAffinity::Both,
    )
}

/// Startup inputs with a zero login delay for fast tests.
pub fn test_startup() -> StartupConfiguration {
    StartupConfiguration {
        riot_client_path: PathBuf::from("/opt/riot/RiotClientServices"),
        league_path: PathBuf::new(),
        valorant_path: PathBuf::new(),
        login_delay: Duration::ZERO,
        minimize_on_launch: false,
    }
}
