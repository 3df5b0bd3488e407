// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Minutebook configuration.
///
/// Every section is optional and defaults to values that work for a local,
/// single-user install with HTML reports and no outbound mail.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MinutebookConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Report rendering settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Outbound mail settings for report delivery.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs and report footers.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "minutebook".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("minutebook").join("minutebook.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("minutebook.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Which rasterizer turns composed reports into artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterizerKind {
    /// Emit the composed HTML document as-is.
    #[default]
    Html,
    /// Pipe the HTML through an external program (e.g. `wkhtmltopdf - -`).
    Command,
}

/// Report rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Organization name printed in the report header.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Closing paragraph of the conclusion section.
    #[serde(default = "default_closing_text")]
    pub closing_text: String,

    /// Rasterizer backend.
    #[serde(default)]
    pub rasterizer: RasterizerKind,

    /// Program used when `rasterizer = "command"`. Reads HTML on stdin,
    /// writes the artifact to stdout.
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments passed to `command`.
    #[serde(default)]
    pub args: Vec<String>,

    /// MIME type of the command's output.
    #[serde(default = "default_command_content_type")]
    pub command_content_type: String,

    /// Seconds to wait for the rasterizer before failing the generation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many times a version collision is retried before giving up.
    #[serde(default = "default_max_version_retries")]
    pub max_version_retries: u32,

    /// Directory generated artifacts are written to by the CLI.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Artifact file name prefix; the version and extension are appended.
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            closing_text: default_closing_text(),
            rasterizer: RasterizerKind::default(),
            command: None,
            args: Vec::new(),
            command_content_type: default_command_content_type(),
            timeout_secs: default_timeout_secs(),
            max_version_retries: default_max_version_retries(),
            output_dir: default_output_dir(),
            file_stem: default_file_stem(),
        }
    }
}

fn default_organization() -> String {
    "Minutebook".to_string()
}

fn default_closing_text() -> String {
    "The meeting concluded with the decisions and action items recorded above. \
     Owners will report progress at the next meeting."
        .to_string()
}

fn default_command_content_type() -> String {
    "application/pdf".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_version_retries() -> u32 {
    3
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_stem() -> String {
    "meeting-report".to_string()
}

/// Outbound SMTP configuration. Delivery is disabled while `host` is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// SMTP relay host.
    #[serde(default)]
    pub host: Option<String>,

    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login user name.
    #[serde(default)]
    pub username: Option<String>,

    /// Login password. Prefer `MINUTEBOOK_SMTP_PASSWORD` over the TOML file.
    #[serde(default)]
    pub password: Option<String>,

    /// Sender address, e.g. `Minutes <minutes@example.com>`.
    #[serde(default)]
    pub from_address: Option<String>,

    /// Upgrade the connection with STARTTLS instead of implicit TLS.
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
            starttls: default_starttls(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

impl SmtpConfig {
    /// Whether enough is configured to attempt delivery.
    pub fn is_enabled(&self) -> bool {
        self.host.as_deref().is_some_and(|h| !h.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_and_quiet() {
        let config = MinutebookConfig::default();
        assert_eq!(config.service.name, "minutebook");
        assert_eq!(config.report.rasterizer, RasterizerKind::Html);
        assert_eq!(config.report.max_version_retries, 3);
        assert!(!config.smtp.is_enabled());
        assert!(config.storage.database_path.ends_with("minutebook.db"));
    }

    #[test]
    fn rasterizer_kind_parses_snake_case() {
        let config: MinutebookConfig = toml::from_str(
            r#"
[report]
rasterizer = "command"
command = "wkhtmltopdf"
args = ["-", "-"]
"#,
        )
        .unwrap();
        assert_eq!(config.report.rasterizer, RasterizerKind::Command);
        assert_eq!(config.report.args, vec!["-", "-"]);
    }

    #[test]
    fn blank_smtp_host_is_disabled() {
        let smtp = SmtpConfig {
            host: Some("  ".to_string()),
            ..SmtpConfig::default()
        };
        assert!(!smtp.is_enabled());
    }
}
