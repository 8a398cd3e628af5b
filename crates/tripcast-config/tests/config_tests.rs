// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the tripcast configuration system.

use tripcast_config::diagnostic::{suggest_key, ConfigError};
use tripcast_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_tripcast_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[storage]
database_path = "/tmp/test.db"

[gateway]
openai_api_key = "sk-test-123"

[room]
shared_session_id = "room-42"

[bus]
ring_capacity = 500
replay_count = 20
subscriber_queue_capacity = 50
heartbeat_interval_secs = 2

[limits]
plan_context_truncate_chars = 2000
summary_truncate_chars = 300
audit_reason_chunk_chars = 40
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(config.gateway.openai_api_key.is_some());
    assert_eq!(config.room.shared_session_id, "room-42");
    assert_eq!(config.bus.ring_capacity, 500);
    assert_eq!(config.bus.replay_count, 20);
    assert_eq!(config.bus.subscriber_queue_capacity, 50);
    assert_eq!(config.bus.heartbeat_interval_secs, 2);
    assert_eq!(config.limits.plan_context_truncate_chars, 2000);
    assert_eq!(config.limits.summary_truncate_chars, 300);
    assert_eq!(config.limits.audit_reason_chunk_chars, 40);
}

/// Unknown field in [server] section produces an UnknownField error.
#[test]
fn unknown_field_in_server_produces_error() {
    let toml = r#"
[server]
hst = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("hst"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert!(config.gateway.openai_api_key.is_none());
    assert_eq!(config.room.shared_session_id, "shared-chatroom");
    assert_eq!(config.bus.ring_capacity, 1000);
    assert_eq!(config.bus.replay_count, 50);
    assert_eq!(config.bus.subscriber_queue_capacity, 100);
    assert_eq!(config.bus.heartbeat_interval_secs, 1);
    assert_eq!(config.limits.plan_context_truncate_chars, 3000);
    assert_eq!(config.limits.summary_truncate_chars, 500);
    assert_eq!(config.limits.audit_reason_chunk_chars, 50);
}

/// Environment variable override maps to the expected dotted key
/// (e.g. `TRIPCAST_ROOM_SHARED_SESSION_ID` -> `room.shared_session_id`,
/// not `room.shared.session.id`).
#[test]
fn env_var_overrides_room_shared_session_id() {
    use figment::{providers::Serialized, Figment};
    use tripcast_config::TripcastConfig;

    let config: TripcastConfig = Figment::new()
        .merge(Serialized::defaults(TripcastConfig::default()))
        .merge(("room.shared_session_id", "env-room"))
        .extract()
        .expect("should set shared_session_id via dot notation");

    assert_eq!(config.room.shared_session_id, "env-room");
}

/// Serialized defaults provide sensible values for all required fields.
#[test]
fn serialized_defaults_are_sensible() {
    let config = tripcast_config::TripcastConfig::default();

    assert_eq!(config.server.port, 8080);
    assert!(config.gateway.openai_api_key.is_none());
    assert_eq!(config.bus.ring_capacity, 1000);
    assert_eq!(config.limits.audit_reason_chunk_chars, 50);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };
    use tripcast_config::TripcastConfig;

    let config: TripcastConfig = Figment::new()
        .merge(Serialized::defaults(TripcastConfig::default()))
        .merge(Toml::file("/nonexistent/path/tripcast.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.server.port, 8080);
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

// ============================================================================
// Diagnostic and validation tests
// ============================================================================

/// Unknown key "hst" in [server] produces suggestion "did you mean `host`?"
#[test]
fn diagnostic_hst_suggests_host() {
    let valid_keys = &["host", "port"];
    let suggestion = suggest_key("hst", valid_keys);
    assert_eq!(suggestion, Some("host".to_string()));
}

/// Unknown key with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["host", "port"];
    let suggestion = suggest_key("zzzzzz", valid_keys);
    assert!(suggestion.is_none(), "should not suggest for distant typo");
}

/// Error output from load_and_validate_str includes the unknown key name.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[server]
hst = "test"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "hst"
                && suggestion.as_deref() == Some("host")
                && valid_keys.contains("host")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'hst' with suggestion 'host', got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[server]
port = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("port"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "hst".to_string(),
        suggestion: Some("host".to_string()),
        valid_keys: "host, port".to_string(),
        span: None,
        src: None,
    };

    let code = error.code();
    assert!(code.is_some(), "should have diagnostic code");

    let help = error.help();
    assert!(help.is_some(), "should have help text");
    let help_str = help.unwrap().to_string();
    assert!(
        help_str.contains("did you mean `host`"),
        "help should contain suggestion, got: {help_str}"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[server]
host = "test-host"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.server.host, "test-host");
}

/// load_and_validate with defaults works (no config file needed).
#[test]
fn load_and_validate_defaults() {
    let config = tripcast_config::load_and_validate().expect("defaults should validate");
    assert_eq!(config.server.port, 8080);
}

/// Validation catches an empty shared_session_id.
#[test]
fn validation_catches_empty_shared_session_id() {
    let toml = r#"
[room]
shared_session_id = ""
"#;

    let errors = load_and_validate_str(toml).expect_err("empty session id should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("shared_session_id"))
    });
    assert!(has_validation_error, "should have validation error for empty shared_session_id");
}
