//! Timed credential hand-off into the client login surface.
//!
//! The sequencer owns the two timing-sensitive pieces of a launch: the
//! configured delay between client readiness and the first keystroke,
//! and the pacing of the keystrokes themselves. Delivery goes through
//! the [`CredentialInjector`] trait so tests can record the sequence
//! instead of driving a real keyboard.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::{debug, info};

use crate::{AppError, Result};

/// Pause between individual characters. Clients drop keystrokes that
/// arrive faster than their input loop drains them.
const KEY_PAUSE: Duration = Duration::from_millis(5);

/// Pause between the username, Tab, password, and Enter stages.
const FIELD_PAUSE: Duration = Duration::from_millis(100);

/// One step of the login keystroke sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// Literal text, typed character by character.
    Text(String),
    /// Advance from the username field to the password field.
    Tab,
    /// Submit the login form.
    Enter,
}

/// The fixed login sequence: username, Tab, password, Enter.
#[must_use]
pub fn keystroke_plan(username: &str, password: &str) -> Vec<Keystroke> {
    vec![
        Keystroke::Text(username.to_owned()),
        Keystroke::Tab,
        Keystroke::Text(password.to_owned()),
        Keystroke::Enter,
    ]
}

/// Delivers a keystroke plan into whatever owns keyboard focus.
pub trait CredentialInjector: Send + Sync {
    /// Execute the plan.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Handoff`](crate::AppError::Handoff) when the
    /// input device cannot be driven.
    fn inject(&self, plan: Vec<Keystroke>) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production injector driving the OS input layer through `enigo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnigoInjector;

impl EnigoInjector {
    /// Construct the injector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn run_plan(plan: &[Keystroke]) -> Result<()> {
    let mut enigo = Enigo::new(&Settings::default())
        .map_err(|err| AppError::Handoff(format!("input device unavailable: {err}")))?;

    for step in plan {
        match step {
            Keystroke::Text(text) => {
                for ch in text.chars() {
                    enigo
                        .text(&ch.to_string())
                        .map_err(|err| AppError::Handoff(format!("typing failed: {err}")))?;
                    std::thread::sleep(KEY_PAUSE);
                }
            }
            Keystroke::Tab => {
                enigo
                    .key(Key::Tab, Direction::Click)
                    .map_err(|err| AppError::Handoff(format!("tab failed: {err}")))?;
            }
            Keystroke::Enter => {
                enigo
                    .key(Key::Return, Direction::Click)
                    .map_err(|err| AppError::Handoff(format!("submit failed: {err}")))?;
            }
        }
        std::thread::sleep(FIELD_PAUSE);
    }
    Ok(())
}

impl CredentialInjector for EnigoInjector {
    fn inject(
        &self,
        plan: Vec<Keystroke>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            tokio::task::spawn_blocking(move || run_plan(&plan))
                .await
                .map_err(|err| AppError::Handoff(format!("injection task failed: {err}")))?
        })
    }
}

/// Owns the hand-off timing: wait out the login delay, then deliver the
/// credential sequence.
pub struct HandoffSequencer {
    login_delay: Duration,
    injector: Arc<dyn CredentialInjector>,
}

impl HandoffSequencer {
    /// Construct a sequencer for one launch run.
    #[must_use]
    pub fn new(login_delay: Duration, injector: Arc<dyn CredentialInjector>) -> Self {
        Self {
            login_delay,
            injector,
        }
    }

    /// Wait the configured delay, then type the credentials.
    ///
    /// The delay is deliberate: the login surface takes variable time to
    /// become interactive, and typing early misdirects credentials into
    /// whatever window currently has focus.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Handoff`](crate::AppError::Handoff) when
    /// delivery fails.
    pub async fn hand_off(&self, username: &str, password: &str) -> Result<()> {
        debug!(delay_secs = self.login_delay.as_secs(), "waiting for login surface");
        tokio::time::sleep(self.login_delay).await;

        self.injector
            .inject(keystroke_plan(username, password))
            .await?;
        info!("credentials delivered");
        Ok(())
    }
}
