// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rasterizer backends.
//!
//! [`HtmlRasterizer`] ships the composed HTML page as the artifact.
//! [`CommandRasterizer`] pipes it through an external converter such as
//! `wkhtmltopdf - -` and ships whatever the program writes to stdout.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use minutebook_config::model::{RasterizerKind, ReportConfig};
use minutebook_core::{
    AdapterType, Artifact, HealthStatus, MinutebookError, PluginAdapter, RasterizerAdapter,
};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Build the rasterizer selected by the report configuration.
pub fn from_config(
    config: &ReportConfig,
) -> Result<Arc<dyn RasterizerAdapter + Send + Sync>, MinutebookError> {
    match config.rasterizer {
        RasterizerKind::Html => Ok(Arc::new(HtmlRasterizer)),
        RasterizerKind::Command => {
            let program = config
                .command
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    MinutebookError::Config(
                        "report.command is required when report.rasterizer = \"command\"".to_string(),
                    )
                })?;
            Ok(Arc::new(
                CommandRasterizer::new(program, config.args.clone(), &config.command_content_type)
                    .with_timeout(Duration::from_secs(config.timeout_secs.max(1))),
            ))
        }
    }
}

/// Passes the HTML document through unchanged.
pub struct HtmlRasterizer;

#[async_trait]
impl PluginAdapter for HtmlRasterizer {
    fn name(&self) -> &str {
        "html"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Rasterizer
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        Ok(())
    }
}

#[async_trait]
impl RasterizerAdapter for HtmlRasterizer {
    async fn rasterize(&self, html: &str) -> Result<Artifact, MinutebookError> {
        Ok(Artifact {
            bytes: html.as_bytes().to_vec(),
            content_type: "text/html; charset=utf-8".to_string(),
            extension: "html".to_string(),
        })
    }
}

/// Runs an external program with the HTML on stdin and takes stdout as the
/// artifact.
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
    content_type: String,
    timeout: Duration,
}

impl CommandRasterizer {
    pub fn new(program: &str, args: Vec<String>, content_type: &str) -> Self {
        Self {
            program: program.to_string(),
            args,
            content_type: content_type.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, html: &str) -> Result<Vec<u8>, MinutebookError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MinutebookError::Rasterization {
                message: format!("failed to start `{}`: {e}", self.program),
                source: Some(Box::new(e)),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| MinutebookError::Rasterization {
            message: "rasterizer stdin unavailable".to_string(),
            source: None,
        })?;
        let input = html.as_bytes().to_vec();
        let feed = async move {
            let written = stdin.write_all(&input).await;
            // Dropping stdin closes the pipe so the program sees EOF.
            drop(stdin);
            written
        };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| MinutebookError::Rasterization {
            message: format!("`{}` did not complete: {e}", self.program),
            source: Some(Box::new(e)),
        })?;
        if let Err(e) = written {
            // A converter may exit before reading all input; its exit status decides.
            debug!(program = %self.program, error = %e, "rasterizer closed stdin early");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output.status.code().unwrap_or(-1);
            warn!(program = %self.program, code, "rasterizer exited with an error");
            return Err(MinutebookError::Rasterization {
                message: format!("`{}` exited with code {code}: {}", self.program, stderr.trim()),
                source: None,
            });
        }
        if output.stdout.is_empty() {
            return Err(MinutebookError::Rasterization {
                message: format!("`{}` produced no output", self.program),
                source: None,
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl PluginAdapter for CommandRasterizer {
    fn name(&self) -> &str {
        "command"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Rasterizer
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        if self.program.trim().is_empty() {
            return Ok(HealthStatus::Unhealthy("no rasterizer command".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        Ok(())
    }
}

#[async_trait]
impl RasterizerAdapter for CommandRasterizer {
    async fn rasterize(&self, html: &str) -> Result<Artifact, MinutebookError> {
        let bytes = tokio::time::timeout(self.timeout, self.run(html))
            .await
            .map_err(|_| MinutebookError::Rasterization {
                message: format!(
                    "`{}` timed out after {}s",
                    self.program,
                    self.timeout.as_secs_f64()
                ),
                source: None,
            })??;
        debug!(program = %self.program, bytes = bytes.len(), "rasterized report");
        Ok(Artifact {
            bytes,
            content_type: self.content_type.clone(),
            extension: extension_for(&self.content_type).to_string(),
        })
    }
}

/// File extension for a MIME type, ignoring parameters.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "application/pdf" => "pdf",
        "text/html" => "html",
        "image/png" => "png",
        "image/svg+xml" => "svg",
        "application/postscript" => "ps",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn html_rasterizer_returns_the_page() {
        let artifact = HtmlRasterizer.rasterize("<p>hi</p>").await.unwrap();
        assert_eq!(artifact.bytes, b"<p>hi</p>");
        assert_eq!(artifact.extension, "html");
        assert!(artifact.content_type.starts_with("text/html"));
    }

    #[test]
    fn extensions_follow_content_type() {
        assert_eq!(extension_for("application/pdf"), "pdf");
        assert_eq!(extension_for("text/html; charset=utf-8"), "html");
        assert_eq!(extension_for("IMAGE/PNG"), "png");
        assert_eq!(extension_for("application/x-unknown"), "bin");
    }

    #[test]
    fn command_kind_needs_a_program() {
        let config = ReportConfig {
            rasterizer: RasterizerKind::Command,
            command: Some("  ".to_string()),
            ..ReportConfig::default()
        };
        assert!(matches!(from_config(&config), Err(MinutebookError::Config(_))));

        let html = from_config(&ReportConfig::default()).unwrap();
        assert_eq!(html.name(), "html");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_output_becomes_the_artifact() {
        let rasterizer = CommandRasterizer::new("cat", Vec::new(), "application/pdf");
        let artifact = rasterizer.rasterize("%PDF-fake").await.unwrap();
        assert_eq!(artifact.bytes, b"%PDF-fake");
        assert_eq!(artifact.extension, "pdf");
        assert_eq!(artifact.content_type, "application/pdf");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_a_rasterization_error() {
        let rasterizer = CommandRasterizer::new(
            "sh",
            vec!["-c".to_string(), "echo broken >&2; exit 3".to_string()],
            "application/pdf",
        );
        let err = rasterizer.rasterize("<p>x</p>").await.unwrap_err();
        match err {
            MinutebookError::Rasterization { message, .. } => {
                assert!(message.contains("code 3"));
                assert!(message.contains("broken"));
            }
            other => panic!("expected rasterization error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_output_is_rejected() {
        let rasterizer = CommandRasterizer::new("true", Vec::new(), "application/pdf");
        let err = rasterizer.rasterize("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, MinutebookError::Rasterization { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let rasterizer = CommandRasterizer::new("sleep", vec!["5".to_string()], "application/pdf")
            .with_timeout(Duration::from_millis(200));
        let err = rasterizer.rasterize("<p>x</p>").await.unwrap_err();
        match err {
            MinutebookError::Rasterization { message, .. } => assert!(message.contains("timed out")),
            other => panic!("expected rasterization error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_fails_to_start() {
        let rasterizer =
            CommandRasterizer::new("minutebook-no-such-converter", Vec::new(), "application/pdf");
        let err = rasterizer.rasterize("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, MinutebookError::Rasterization { .. }));
    }
}
