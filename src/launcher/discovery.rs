//! Riot client executable discovery.
//!
//! Consulted when the configured client path is empty or stale. The
//! installer records its locations in `RiotClientInstalls.json`; the
//! well-known install paths are a fallback for manual installs.

use std::path::PathBuf;

use tracing::debug;

/// Priority order of the install-registry keys.
const INSTALL_KEYS: &[&str] = &["rc_live", "rc_default", "rc_beta"];

#[cfg(target_os = "windows")]
const WELL_KNOWN_PATHS: &[&str] = &[
    "C:\\Riot Games\\Riot Client\\RiotClientServices.exe",
    "C:\\Program Files\\Riot Games\\Riot Client\\RiotClientServices.exe",
    "C:\\Program Files (x86)\\Riot Games\\Riot Client\\RiotClientServices.exe",
    "D:\\Riot Games\\Riot Client\\RiotClientServices.exe",
];

#[cfg(target_os = "macos")]
const WELL_KNOWN_PATHS: &[&str] = &[
    "/Applications/Riot Client.app/Contents/MacOS/RiotClientServices",
    "/Users/Shared/Riot Games/Riot Client.app/Contents/MacOS/RiotClientServices",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const WELL_KNOWN_PATHS: &[&str] = &[];

/// Locate the Riot client executable, or `None` if it cannot be found.
#[must_use]
pub fn find_riot_client() -> Option<PathBuf> {
    if let Some(path) = find_from_installs_json() {
        debug!(path = %path.display(), "riot client found via install registry");
        return Some(path);
    }

    for candidate in WELL_KNOWN_PATHS {
        let path = PathBuf::from(candidate);
        if path.exists() {
            debug!(path = %path.display(), "riot client found at well-known path");
            return Some(path);
        }
    }

    None
}

/// Candidate paths recorded in an install-registry document, in
/// priority order. Split out from the existence check so the parse is
/// testable without an install.
#[must_use]
pub fn install_candidates(raw: &str) -> Vec<PathBuf> {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Vec::new();
    };

    INSTALL_KEYS
        .iter()
        .filter_map(|key| json.get(key).and_then(serde_json::Value::as_str))
        .map(PathBuf::from)
        .collect()
}

fn find_from_installs_json() -> Option<PathBuf> {
    let registry = installs_json_path()?;
    let raw = std::fs::read_to_string(&registry).ok()?;
    install_candidates(&raw).into_iter().find(|path| path.exists())
}

fn installs_json_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("ProgramData").ok().map(|program_data| {
            PathBuf::from(program_data)
                .join("Riot Games")
                .join("RiotClientInstalls.json")
        })
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home).join("Library/Application Support/Riot Games/RiotClientInstalls.json")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        None
    }
}
