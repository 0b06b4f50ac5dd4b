//! The conflict-aware launch state machine.
//!
//! One `request_launch` call drives a run `Idle → Probing → {Clean,
//! Conflicted}`. A clean run launches directly. A conflicted run is
//! suspended: the caller receives the running kinds plus a
//! [`ConfirmationToken`] and decides. Dropping the token cancels with
//! no side effects; [`LaunchOrchestrator::resume_launch`] re-enters at
//! `Closing` and runs to a terminal state — once termination requests
//! go out, the sequence is no longer cancellable.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::StartupConfiguration;
use crate::launcher::{GameLauncher, LaunchReceipt};
use crate::models::account::GameKind;
use crate::models::phase::LaunchPhase;
use crate::models::request::{CloseScope, LaunchRequest};
use crate::orchestrator::{FlightPermit, FlightRegistry, LastLoginSink};
use crate::process::{ProcessProbe, ProcessTerminator};
use crate::{AppError, Result};

/// Interval between close-confirmation probes.
pub const CLOSE_CONFIRM_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum close-confirmation probes before reporting
/// [`AppError::ForceCloseTimeout`]. The orchestrator never escalates
/// beyond the single termination request already issued.
pub const CLOSE_CONFIRM_ATTEMPTS: u32 = 5;

/// Result of one `request_launch` call.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The run completed; `last_login` has been stamped.
    Completed(LaunchReceipt),
    /// The target kind is already running. No destructive action has
    /// been taken; the caller decides whether to close and continue.
    Conflicted {
        /// Every managed kind observed running at probe time.
        running: Vec<GameKind>,
        /// Resume handle. Drop to cancel with no side effects.
        token: ConfirmationToken,
    },
}

/// Suspended conflicted run awaiting an explicit decision.
///
/// Holds the run's inputs and its serialization permit. Consumed by
/// [`LaunchOrchestrator::resume_launch`]; dropping it instead releases
/// the permit and abandons the run untouched.
#[derive(Debug)]
pub struct ConfirmationToken {
    request: LaunchRequest,
    config: StartupConfiguration,
    running: Vec<GameKind>,
    permit: FlightPermit,
}

impl ConfirmationToken {
    /// The kind the suspended run targets.
    #[must_use]
    pub fn kind(&self) -> GameKind {
        self.request.kind
    }

    /// The kinds observed running when the conflict surfaced.
    #[must_use]
    pub fn running(&self) -> &[GameKind] {
        &self.running
    }
}

/// Stateless launch service. Instantiated once, invoked per request;
/// all run state lives on the call stack of one invocation.
pub struct LaunchOrchestrator {
    probe: Arc<dyn ProcessProbe>,
    terminator: Arc<dyn ProcessTerminator>,
    launcher: Arc<dyn GameLauncher>,
    sink: Arc<dyn LastLoginSink>,
    flights: FlightRegistry,
}

impl LaunchOrchestrator {
    /// Compose an orchestrator from its collaborators.
    #[must_use]
    pub fn new(
        probe: Arc<dyn ProcessProbe>,
        terminator: Arc<dyn ProcessTerminator>,
        launcher: Arc<dyn GameLauncher>,
        sink: Arc<dyn LastLoginSink>,
    ) -> Self {
        Self {
            probe,
            terminator,
            launcher,
            sink,
            flights: FlightRegistry::new(),
        }
    }

    /// The registry backing the serialization invariant, shared with the
    /// background status monitor so it can stay out of in-flight runs.
    #[must_use]
    pub fn flights(&self) -> FlightRegistry {
        self.flights.clone()
    }

    /// Start one orchestrated launch run.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] before any OS interaction
    /// when the request is unusable, [`AppError::LaunchInProgress`] when
    /// a run for the same kind is in flight,
    /// [`AppError::StatusUnavailable`] when the probe cannot answer, and
    /// the launcher's error unmodified when launching fails.
    pub async fn request_launch(
        &self,
        request: LaunchRequest,
        config: StartupConfiguration,
    ) -> Result<LaunchOutcome> {
        let span = info_span!(
            "launch_flow",
            account = %request.account.id,
            kind = %request.kind
        );
        self.start(request, config).instrument(span).await
    }

    async fn start(
        &self,
        request: LaunchRequest,
        config: StartupConfiguration,
    ) -> Result<LaunchOutcome> {
        let mut phase = LaunchPhase::Idle;

        // Reject bad input before touching the OS or the registry.
        request.validate()?;

        let permit = self.flights.acquire(request.kind)?;
        advance(&mut phase, LaunchPhase::Probing);

        let status = match self.probe.probe().await {
            Ok(status) => status,
            Err(err) => return Err(fail(&mut phase, err)),
        };

        if status.is_running(request.kind) {
            advance(&mut phase, LaunchPhase::Conflicted);
            let running = status.running_kinds();
            info!(running = ?running, "conflict detected; awaiting confirmation");
            return Ok(LaunchOutcome::Conflicted {
                running: running.clone(),
                token: ConfirmationToken {
                    request,
                    config,
                    running,
                    permit,
                },
            });
        }

        advance(&mut phase, LaunchPhase::Clean);
        advance(&mut phase, LaunchPhase::Launching);
        let receipt = match self.launch_and_record(&request, &config).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(fail(&mut phase, err)),
        };
        advance(&mut phase, LaunchPhase::Completed);

        drop(permit);
        Ok(LaunchOutcome::Completed(receipt))
    }

    /// Resume a conflicted run after explicit confirmation.
    ///
    /// Re-enters at `Closing` and always reaches a terminal state:
    /// termination requests cannot be un-issued, so there is no
    /// cancellation past this point.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StatusUnavailable`] if the pre-close re-probe
    /// fails (nothing destructive has happened yet),
    /// [`AppError::ForceCloseTimeout`] when the bounded confirmation
    /// polls are exhausted, and the launcher's error unmodified when the
    /// subsequent launch fails.
    pub async fn resume_launch(
        &self,
        token: ConfirmationToken,
        scope: CloseScope,
    ) -> Result<LaunchReceipt> {
        let span = info_span!(
            "launch_flow",
            account = %token.request.account.id,
            kind = %token.request.kind,
            resumed = true
        );
        self.resume(token, scope).instrument(span).await
    }

    async fn resume(&self, token: ConfirmationToken, scope: CloseScope) -> Result<LaunchReceipt> {
        let ConfirmationToken {
            request,
            config,
            running,
            permit,
        } = token;
        let mut phase = LaunchPhase::Conflicted;

        advance(&mut phase, LaunchPhase::Closing);

        // The conflict snapshot is advisory by now; re-probe before
        // anything destructive. A failed probe aborts — still harmless.
        let status = match self.probe.probe().await {
            Ok(status) => status,
            Err(err) => return Err(fail(&mut phase, err)),
        };

        let in_scope: Vec<GameKind> = match scope {
            CloseScope::TargetOnly => vec![request.kind],
            CloseScope::All => running,
        };
        let targets: Vec<GameKind> = in_scope
            .into_iter()
            .filter(|kind| status.is_running(*kind))
            .collect();

        for kind in &targets {
            // Best-effort: a refused signal is recorded, not fatal. Only
            // the confirmation probes below decide the outcome.
            if let Err(err) = self.terminator.request_close(*kind).await {
                warn!(%kind, %err, "termination request failed; continuing to confirmation");
            }
        }

        advance(&mut phase, LaunchPhase::ConfirmingClose);
        if !targets.is_empty() {
            self.confirm_closed(&targets, &mut phase).await?;
        }

        advance(&mut phase, LaunchPhase::Launching);
        let receipt = match self.launch_and_record(&request, &config).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(fail(&mut phase, err)),
        };
        advance(&mut phase, LaunchPhase::Completed);

        drop(permit);
        Ok(receipt)
    }

    /// Bounded confirmation loop: re-probe until every closed kind
    /// reports not-running, at most [`CLOSE_CONFIRM_ATTEMPTS`] probes at
    /// [`CLOSE_CONFIRM_INTERVAL`] spacing. A failed probe consumes an
    /// attempt and counts as "still running" — never assume not-running.
    async fn confirm_closed(&self, targets: &[GameKind], phase: &mut LaunchPhase) -> Result<()> {
        for attempt in 1..=CLOSE_CONFIRM_ATTEMPTS {
            tokio::time::sleep(CLOSE_CONFIRM_INTERVAL).await;

            match self.probe.probe().await {
                Ok(status) => {
                    if targets.iter().all(|kind| !status.is_running(*kind)) {
                        info!(attempt, "close confirmed");
                        return Ok(());
                    }
                    debug!(attempt, "still observed running");
                }
                Err(err) => {
                    warn!(attempt, %err, "confirmation probe failed");
                }
            }
        }

        advance(phase, LaunchPhase::CloseTimedOut);
        Err(fail(
            phase,
            AppError::ForceCloseTimeout(format!(
                "still observed running after {CLOSE_CONFIRM_ATTEMPTS} checks; \
                 close the game manually and try again"
            )),
        ))
    }

    async fn launch_and_record(
        &self,
        request: &LaunchRequest,
        config: &StartupConfiguration,
    ) -> Result<LaunchReceipt> {
        let receipt = self
            .launcher
            .launch(&request.account, request.kind, config)
            .await?;

        // Fire-and-forget: a storage hiccup must not fail a launch that
        // already happened.
        if let Err(err) = self
            .sink
            .update_last_login(&request.account.id, receipt.completed_at)
            .await
        {
            warn!(account = %request.account.id, %err, "last_login update failed");
        }

        Ok(receipt)
    }
}

fn advance(phase: &mut LaunchPhase, next: LaunchPhase) {
    if !phase.can_transition_to(next) {
        warn!(from = %phase, to = %next, "unexpected phase transition");
    }
    debug!(from = %phase, to = %next, "phase transition");
    *phase = next;
}

fn fail(phase: &mut LaunchPhase, err: AppError) -> AppError {
    advance(phase, LaunchPhase::Failed);
    err
}
