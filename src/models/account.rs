//! Account model and the closed set of managed games.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the two managed game titles. Closed set, not extensible at
/// runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// League of Legends.
    League,
    /// Valorant.
    Valorant,
}

impl GameKind {
    /// Both managed kinds, in display order.
    pub const ALL: [Self; 2] = [Self::League, Self::Valorant];

    /// Stable lowercase identifier used in logs and the CLI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Valorant => "valorant",
        }
    }
}

impl Display for GameKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which titles an account is intended for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameAffinity {
    /// League of Legends only.
    League,
    /// Valorant only.
    Valorant,
    /// Either title.
    #[default]
    Both,
}

impl GameAffinity {
    /// Whether the affinity permits launching the given kind.
    #[must_use]
    pub fn covers(self, kind: GameKind) -> bool {
        match self {
            Self::Both => true,
            Self::League => kind == GameKind::League,
            Self::Valorant => kind == GameKind::Valorant,
        }
    }
}

/// Stored credential set for one Riot account.
///
/// Owned by the account store. An orchestration run reads one account
/// for the duration of a single launch call and never retains it. The
/// `password` field may be empty when the OS keychain holds the secret;
/// it is never logged or displayed either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Account {
    /// Unique record identifier.
    pub id: String,
    /// Display name shown in listings.
    pub name: String,
    /// Riot login username.
    pub username: String,
    /// Stored password; empty when the keychain is authoritative.
    pub password: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form grouping label, possibly empty.
    #[serde(default)]
    pub category: String,
    /// Which titles this account is used for.
    #[serde(default)]
    pub game: GameAffinity,
    /// Timestamp of the last successful orchestrated launch.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Construct a new account with a generated identifier.
    #[must_use]
    pub fn new(
        name: String,
        username: String,
        password: String,
        category: String,
        game: GameAffinity,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            username,
            password,
            email: None,
            category,
            game,
            last_login: None,
        }
    }
}
