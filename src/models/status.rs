//! Point-in-time process status snapshot.

use serde::{Deserialize, Serialize};

use crate::models::account::GameKind;

/// Snapshot of which managed games are currently observed running.
///
/// Ephemeral by design: recomputed on every probe and never cached
/// beyond the caller's use, so a stale snapshot can only ever mislead
/// the display, never a destructive action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GameStatus {
    /// A League of Legends process is observed running.
    pub league_running: bool,
    /// A Valorant process is observed running.
    pub valorant_running: bool,
}

impl GameStatus {
    /// Whether a managed process of the given kind is observed running.
    #[must_use]
    pub fn is_running(self, kind: GameKind) -> bool {
        match kind {
            GameKind::League => self.league_running,
            GameKind::Valorant => self.valorant_running,
        }
    }

    /// Whether any managed process is observed running.
    #[must_use]
    pub fn any_running(self) -> bool {
        self.league_running || self.valorant_running
    }

    /// The kinds currently observed running, in display order.
    #[must_use]
    pub fn running_kinds(self) -> Vec<GameKind> {
        GameKind::ALL
            .into_iter()
            .filter(|kind| self.is_running(*kind))
            .collect()
    }
}
