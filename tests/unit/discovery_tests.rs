use std::path::PathBuf;

use riftswitch::launcher::discovery::install_candidates;

#[test]
fn candidates_follow_priority_order() {
    let raw = r#"{
        "rc_beta": "/riot/beta/RiotClientServices",
        "rc_default": "/riot/default/RiotClientServices",
        "rc_live": "/riot/live/RiotClientServices",
        "associated_client": {}
    }"#;

    assert_eq!(
        install_candidates(raw),
        vec![
            PathBuf::from("/riot/live/RiotClientServices"),
            PathBuf::from("/riot/default/RiotClientServices"),
            PathBuf::from("/riot/beta/RiotClientServices"),
        ]
    );
}

#[test]
fn missing_keys_are_skipped() {
    let raw = r#"{"rc_default": "/riot/default/RiotClientServices"}"#;

    assert_eq!(
        install_candidates(raw),
        vec![PathBuf::from("/riot/default/RiotClientServices")]
    );
}

#[test]
fn non_string_values_are_skipped() {
    let raw = r#"{"rc_live": 42, "rc_default": "/riot/default/RiotClientServices"}"#;

    assert_eq!(
        install_candidates(raw),
        vec![PathBuf::from("/riot/default/RiotClientServices")]
    );
}

#[test]
fn malformed_registry_yields_nothing() {
    assert!(install_candidates("not json at all").is_empty());
    assert!(install_candidates("").is_empty());
    assert!(install_candidates("[]").is_empty());
}
