// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutebook check` command implementation.
//!
//! Runs diagnostic checks against storage, the configured rasterizer and the
//! SMTP relay, and prints one line per check.

use std::time::{Duration, Instant};

use minutebook_core::{HealthStatus, MinutebookError, PluginAdapter};
use minutebook_email::SmtpDelivery;
use minutebook_report::rasterizer;

use crate::app::App;
use crate::output::Output;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run every check. Fails when any check fails; warnings are only printed.
pub async fn run_check(app: &App, out: &Output, deep: bool) -> Result<(), MinutebookError> {
    let results = vec![
        check_adapter("Storage", app.storage().as_ref()).await,
        check_rasterizer(app).await,
        check_delivery(app, deep).await,
    ];

    println!();
    println!("  {}", out.heading("minutebook check"));
    println!("  {}", "-".repeat(50));
    let mut fail_count = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = format!("{:<12} {} ({duration_ms}ms)", result.name, result.message);
        match result.status {
            CheckStatus::Pass => out.success(&line),
            CheckStatus::Warn => out.warn(&line),
            CheckStatus::Fail => {
                fail_count += 1;
                out.error(&line);
            }
        }
    }
    println!();

    if fail_count > 0 {
        return Err(MinutebookError::Internal(format!(
            "{fail_count} check(s) failed"
        )));
    }
    println!("  All checks passed.");
    Ok(())
}

async fn check_adapter<A: PluginAdapter + ?Sized>(name: &str, adapter: &A) -> CheckResult {
    let start = Instant::now();
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new(name, CheckStatus::Pass, format!("{} healthy", adapter.name()), start)
        }
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new(name, CheckStatus::Warn, format!("degraded: {reason}"), start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new(name, CheckStatus::Fail, format!("unhealthy: {reason}"), start)
        }
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_rasterizer(app: &App) -> CheckResult {
    let start = Instant::now();
    match rasterizer::from_config(&app.config.report) {
        Ok(adapter) => check_adapter("Rasterizer", adapter.as_ref()).await,
        Err(e) => CheckResult::new("Rasterizer", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_delivery(app: &App, deep: bool) -> CheckResult {
    let start = Instant::now();
    if !app.config.smtp.is_enabled() {
        return CheckResult::new(
            "Delivery",
            CheckStatus::Warn,
            "no SMTP relay configured, reports cannot be mailed",
            start,
        );
    }
    match SmtpDelivery::from_config(&app.config.smtp) {
        Ok(delivery) if deep => check_adapter("Delivery", &delivery).await,
        Ok(_) => CheckResult::new(
            "Delivery",
            CheckStatus::Pass,
            "SMTP configured (use --deep to connect)",
            start,
        ),
        Err(e) => CheckResult::new("Delivery", CheckStatus::Fail, e.to_string(), start),
    }
}
