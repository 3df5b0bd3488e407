// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Minutebook configuration system.

use minutebook_config::diagnostic::ConfigError;
use minutebook_config::model::RasterizerKind;
use minutebook_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Every section and field deserializes.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[service]
name = "board-minutes"
log_level = "debug"

[storage]
database_path = "/tmp/minutes.db"
wal_mode = false

[report]
organization = "Acme Corp"
closing_text = "Adjourned."
rasterizer = "command"
command = "wkhtmltopdf"
args = ["--quiet", "-", "-"]
command_content_type = "application/pdf"
timeout_secs = 30
max_version_retries = 5
output_dir = "/tmp/reports"

[smtp]
host = "smtp.example.com"
port = 465
username = "minutes"
password = "secret"
from_address = "Minutes <minutes@example.com>"
starttls = false
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.service.name, "board-minutes");
    assert_eq!(config.storage.database_path, "/tmp/minutes.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.report.organization, "Acme Corp");
    assert_eq!(config.report.rasterizer, RasterizerKind::Command);
    assert_eq!(config.report.args.len(), 3);
    assert_eq!(config.report.timeout_secs, 30);
    assert_eq!(config.report.max_version_retries, 5);
    assert_eq!(config.smtp.port, 465);
    assert!(config.smtp.is_enabled());
    assert!(!config.smtp.starttls);
}

/// Missing sections fall back to defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should load");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.report.rasterizer, RasterizerKind::Html);
    assert_eq!(config.report.command_content_type, "application/pdf");
    assert!(config.storage.wal_mode);
    assert!(config.smtp.host.is_none());
}

/// A typo in [report] produces an UnknownKey with a suggestion.
#[test]
fn typo_in_report_suggests_correct_key() {
    let toml = r#"
[report]
organisation = "Acme"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should fail");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "organisation"
                && suggestion.as_deref() == Some("organization")
                && valid_keys.contains("closing_text")
        })
    });
    assert!(found, "expected suggestion for organisation, got: {errors:?}");
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[calendar]
sync = true
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown section should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "calendar")));
}

/// A string where a number belongs is reported, not silently defaulted.
#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[report]
timeout_secs = "soon"
"#;
    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let text = err.to_string();
    assert!(
        text.contains("invalid type") || text.contains("timeout_secs"),
        "got: {text}"
    );
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn command_rasterizer_without_command_fails_validation() {
    let toml = r#"
[report]
rasterizer = "command"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("report.command"))
    ));
}

/// Diagnostics render through miette.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "databse_path".to_string(),
        suggestion: Some("database_path".to_string()),
        valid_keys: "database_path, wal_mode".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `database_path`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("databse_path"));
}

/// An explicit path that does not exist is an error, not silent defaults.
#[test]
fn explicit_missing_path_is_an_error() {
    let errors = load_and_validate_path(std::path::Path::new("/nonexistent/minutebook.toml"))
        .expect_err("missing file should fail");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("does not exist")));
}

/// An explicit path is loaded and validated.
#[test]
fn explicit_path_loads() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[service]\nname = \"custom\"\n")?;
        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .expect("custom file should load");
        assert_eq!(config.service.name, "custom");
        Ok(())
    });
}
