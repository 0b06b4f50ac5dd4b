//! Executable name markers for the managed processes.
//!
//! Matching is a case-insensitive substring test on the process name,
//! so the same lists hold with and without an `.exe` suffix.

use crate::models::account::GameKind;
use crate::models::status::GameStatus;

/// League of Legends processes.
pub const LEAGUE_MARKERS: &[&str] = &["LeagueClient", "LeagueClientUx", "League of Legends"];

/// Valorant processes. "VALORANT" also covers the shipping binary.
pub const VALORANT_MARKERS: &[&str] = &["VALORANT"];

/// The Riot client shim both titles ride on. Tracked separately from the
/// games: its presence means the login surface exists, not that a game
/// is running.
pub const RIOT_CLIENT_MARKERS: &[&str] = &["RiotClientServices", "RiotClientUx"];

/// Marker list for one managed kind.
#[must_use]
pub fn markers_for(kind: GameKind) -> &'static [&'static str] {
    match kind {
        GameKind::League => LEAGUE_MARKERS,
        GameKind::Valorant => VALORANT_MARKERS,
    }
}

/// Whether a process name matches any marker in the list.
#[must_use]
pub fn name_matches(process_name: &str, markers: &[&str]) -> bool {
    let lowered = process_name.to_lowercase();
    markers
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Fold a snapshot of process names into a [`GameStatus`].
#[must_use]
pub fn status_from_names<S: AsRef<str>>(names: &[S]) -> GameStatus {
    GameStatus {
        league_running: names
            .iter()
            .any(|name| name_matches(name.as_ref(), LEAGUE_MARKERS)),
        valorant_running: names
            .iter()
            .any(|name| name_matches(name.as_ref(), VALORANT_MARKERS)),
    }
}

/// Whether any name in the snapshot is the client shim.
#[must_use]
pub fn client_in_names<S: AsRef<str>>(names: &[S]) -> bool {
    names
        .iter()
        .any(|name| name_matches(name.as_ref(), RIOT_CLIENT_MARKERS))
}
