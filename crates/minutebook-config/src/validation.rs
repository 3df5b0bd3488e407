// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{MinutebookConfig, RasterizerKind};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &MinutebookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let report = &config.report;
    if report.rasterizer == RasterizerKind::Command
        && report.command.as_deref().is_none_or(|c| c.trim().is_empty())
    {
        fail("report.command is required when report.rasterizer = \"command\"".to_string());
    }
    if report.max_version_retries == 0 {
        fail("report.max_version_retries must be at least 1".to_string());
    }
    if report.timeout_secs == 0 {
        fail("report.timeout_secs must be at least 1".to_string());
    }
    if report.file_stem.trim().is_empty() || report.file_stem.contains(['/', '\\']) {
        fail(format!(
            "report.file_stem `{}` must be a plain, non-empty file name",
            report.file_stem
        ));
    }
    if report.command_content_type.split('/').count() != 2 {
        fail(format!(
            "report.command_content_type `{}` is not a MIME type",
            report.command_content_type
        ));
    }

    let smtp = &config.smtp;
    if smtp.is_enabled() {
        match smtp.from_address.as_deref() {
            None => fail("smtp.from_address is required when smtp.host is set".to_string()),
            Some(from) if !from.contains('@') => {
                fail(format!("smtp.from_address `{from}` is not an email address"));
            }
            Some(_) => {}
        }
        if smtp.port == 0 {
            fail("smtp.port must not be 0".to_string());
        }
        if smtp.username.is_some() != smtp.password.is_some() {
            fail("smtp.username and smtp.password must be set together".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
