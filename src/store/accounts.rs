//! Persisted account records.
//!
//! A flat JSON map keyed by account id, rewritten whole on every
//! mutation. The orchestrator only ever reads one account per launch
//! and stamps `last_login` afterwards; everything else is CLI-driven
//! bookkeeping.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::account::Account;
use crate::orchestrator::LastLoginSink;
use crate::{AppError, Result};

/// JSON-backed account collection.
pub struct AccountStore {
    path: PathBuf,
    accounts: Mutex<HashMap<String, Account>>,
}

impl AccountStore {
    /// Load the store from disk; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` when the file exists but cannot be
    /// read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let accounts = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|err| AppError::Storage(format!("failed to read account store: {err}")))?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        debug!(path = %path.display(), count = accounts.len(), "account store loaded");
        Ok(Self {
            path,
            accounts: Mutex::new(accounts),
        })
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AppError::Storage("account store mutex poisoned".into()))
    }

    fn persist(&self, accounts: &HashMap<String, Account>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| AppError::Storage(format!("failed to create data dir: {err}")))?;
        }
        let raw = serde_json::to_string_pretty(accounts)?;
        fs::write(&self.path, raw)
            .map_err(|err| AppError::Storage(format!("failed to write account store: {err}")))?;
        Ok(())
    }

    /// Every stored account, ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` on lock failure.
    pub fn list(&self) -> Result<Vec<Account>> {
        let accounts = self.guard()?;
        let mut listed: Vec<Account> = accounts.values().cloned().collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    /// Fetch one account by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when no such record exists.
    pub fn get(&self, id: &str) -> Result<Account> {
        self.guard()?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))
    }

    /// Insert or replace an account record and persist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` when persisting fails.
    pub fn upsert(&self, account: Account) -> Result<()> {
        let mut accounts = self.guard()?;
        info!(account = %account.id, "account saved");
        accounts.insert(account.id.clone(), account);
        self.persist(&accounts)
    }

    /// Remove an account record and persist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when no such record exists, or
    /// `AppError::Storage` when persisting fails.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut accounts = self.guard()?;
        if accounts.remove(id).is_none() {
            return Err(AppError::NotFound(format!("account {id} not found")));
        }
        info!(account = %id, "account removed");
        self.persist(&accounts)
    }

    /// Stamp an account's `last_login` and persist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when no such record exists, or
    /// `AppError::Storage` when persisting fails.
    pub fn set_last_login(&self, id: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let mut accounts = self.guard()?;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))?;
        account.last_login = Some(timestamp);
        self.persist(&accounts)
    }
}

impl LastLoginSink for AccountStore {
    fn update_last_login(
        &self,
        account_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let account_id = account_id.to_owned();
        Box::pin(async move { self.set_last_login(&account_id, timestamp) })
    }
}
