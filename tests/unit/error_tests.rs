use riftswitch::AppError;

#[test]
fn display_prefixes_identify_the_failure_class() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::InvalidRequest("x".into()), "invalid request: x"),
        (
            AppError::StatusUnavailable("x".into()),
            "status unavailable: x",
        ),
        (AppError::Termination("x".into()), "termination request: x"),
        (AppError::ForceCloseTimeout("x".into()), "close timed out: x"),
        (AppError::Spawn("x".into()), "spawn: x"),
        (AppError::Handoff("x".into()), "credential hand-off: x"),
        (
            AppError::LaunchVerifyTimeout("x".into()),
            "launch not verified: x",
        ),
        (
            AppError::LaunchInProgress("x".into()),
            "launch in progress: x",
        ),
        (AppError::NotFound("x".into()), "not found: x"),
        (AppError::Storage("x".into()), "storage: x"),
        (AppError::Io("x".into()), "io: x"),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn pre_destructive_failures_are_retry_safe() {
    assert!(AppError::InvalidRequest("x".into()).is_retry_safe());
    assert!(AppError::StatusUnavailable("x".into()).is_retry_safe());
    assert!(AppError::LaunchInProgress("x".into()).is_retry_safe());
}

#[test]
fn post_destructive_failures_are_not_retry_safe() {
    assert!(!AppError::ForceCloseTimeout("x".into()).is_retry_safe());
    assert!(!AppError::Spawn("x".into()).is_retry_safe());
    assert!(!AppError::Handoff("x".into()).is_retry_safe());
    assert!(!AppError::LaunchVerifyTimeout("x".into()).is_retry_safe());
}

#[test]
fn toml_errors_become_config_errors() {
    let err: AppError = toml::from_str::<riftswitch::GlobalConfig>("data_dir = [")
        .map_err(AppError::from)
        .expect_err("must fail");
    assert!(matches!(err, AppError::Config(_)), "got {err:?}");
}

#[test]
fn json_errors_become_storage_errors() {
    let err: AppError = serde_json::from_str::<serde_json::Value>("{oops")
        .map_err(AppError::from)
        .expect_err("must fail");
    assert!(matches!(err, AppError::Storage(_)), "got {err:?}");
}
