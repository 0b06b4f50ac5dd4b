//! Account password resolution via the OS keychain.
//!
//! The keychain is authoritative when it has an entry; the stored
//! record's password field is the fallback for installs without a
//! usable keychain. Passwords never appear in logs on either path.

use tracing::{debug, warn};

use crate::models::account::Account;
use crate::{AppError, Result};

/// Keychain service name under which account passwords are filed.
const KEYCHAIN_SERVICE: &str = "riftswitch";

async fn keychain_lookup(account_id: String) -> Result<std::result::Result<String, keyring::Error>> {
    // keyring does synchronous OS I/O; keep it off the runtime threads.
    tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYCHAIN_SERVICE, &account_id).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Storage(format!("keychain task panicked: {err}")))
}

/// Resolve the password to hand to the launcher.
///
/// # Errors
///
/// Returns `AppError::InvalidRequest` when neither the keychain nor the
/// stored record holds a non-empty password.
pub async fn resolve_password(account: &Account) -> Result<String> {
    match keychain_lookup(account.id.clone()).await? {
        Ok(password) if !password.is_empty() => {
            debug!(account = %account.id, "password resolved from keychain");
            return Ok(password);
        }
        Ok(_) => {
            warn!(account = %account.id, "keychain entry is empty, using stored record");
        }
        Err(err) => {
            debug!(account = %account.id, ?err, "keychain lookup failed, using stored record");
        }
    }

    if account.password.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "account {} has no password in the keychain or the store",
            account.id
        )));
    }
    Ok(account.password.clone())
}

/// File a password in the keychain. Returns `Ok(false)` when the
/// keychain is unavailable, so the caller can keep the record copy.
///
/// # Errors
///
/// Returns `AppError::Storage` only when the keychain task itself dies.
pub async fn store_password(account_id: &str, password: &str) -> Result<bool> {
    let account_id = account_id.to_owned();
    let password = password.to_owned();

    let outcome = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYCHAIN_SERVICE, &account_id).and_then(|entry| entry.set_password(&password))
    })
    .await
    .map_err(|err| AppError::Storage(format!("keychain task panicked: {err}")))?;

    match outcome {
        Ok(()) => Ok(true),
        Err(err) => {
            warn!(?err, "keychain unavailable; password stays in the record");
            Ok(false)
        }
    }
}

/// Drop a password from the keychain; a missing entry is benign.
pub async fn delete_password(account_id: &str) {
    let account_id = account_id.to_owned();

    let outcome = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYCHAIN_SERVICE, &account_id).and_then(|entry| entry.delete_credential())
    })
    .await;

    match outcome {
        Ok(Ok(())) => debug!("keychain entry removed"),
        Ok(Err(err)) => debug!(?err, "no keychain entry to remove"),
        Err(err) => warn!(%err, "keychain task failed during removal"),
    }
}
