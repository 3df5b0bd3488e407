// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutebook report` commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use minutebook_core::MinutebookError;
use minutebook_report::{GeneratedReport, ReportPipeline};

use crate::app::App;
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Render the next report version and save it to the output directory.
    Generate {
        meeting_id: String,
        /// Mail the report to these addresses (comma separated).
        #[arg(long, value_delimiter = ',')]
        email: Vec<String>,
    },
    /// Render an existing report again from the current documents.
    Regenerate {
        report_id: String,
        /// Mail the report to these addresses (comma separated).
        #[arg(long, value_delimiter = ',')]
        email: Vec<String>,
    },
    /// List a meeting's reports.
    List { meeting_id: String },
}

pub async fn run(app: &App, out: &Output, command: ReportCommand) -> Result<(), MinutebookError> {
    let pipeline = app.pipeline()?;
    let output_dir = Path::new(&app.config.report.output_dir);
    match command {
        ReportCommand::Generate { meeting_id, email } => {
            let generated = pipeline.generate(&meeting_id).await?;
            let path = write_artifact(output_dir, &generated).await?;
            out.success(&format!(
                "report v{} written to {}",
                generated.report.version,
                path.display()
            ));
            send(&pipeline, out, &generated, &email).await?;
        }
        ReportCommand::Regenerate { report_id, email } => {
            let generated = pipeline.regenerate(&report_id).await?;
            let path = write_artifact(output_dir, &generated).await?;
            out.success(&format!(
                "report v{} re-rendered to {}",
                generated.report.version,
                path.display()
            ));
            send(&pipeline, out, &generated, &email).await?;
        }
        ReportCommand::List { meeting_id } => {
            let reports = pipeline.reports(&meeting_id).await?;
            if reports.is_empty() {
                println!("no reports for meeting {meeting_id}");
            }
            for report in reports {
                let delivered = if report.delivered_to.is_empty() {
                    "not delivered".to_string()
                } else {
                    format!("delivered to {}", report.delivered_to.join(", "))
                };
                println!(
                    "{}  {}  {}  {}",
                    out.heading(&format!("v{}", report.version)),
                    out.dim(&report.generated_at),
                    report.id,
                    delivered
                );
            }
        }
    }
    Ok(())
}

async fn send(
    pipeline: &ReportPipeline,
    out: &Output,
    generated: &GeneratedReport,
    recipients: &[String],
) -> Result<(), MinutebookError> {
    if recipients.is_empty() {
        return Ok(());
    }
    let report = pipeline.deliver(generated, recipients).await?;
    out.success(&format!(
        "report v{} mailed; delivered to {}",
        report.version,
        report.delivered_to.join(", ")
    ));
    Ok(())
}

/// Save the artifact as `<output_dir>/<filename>`, creating the directory.
async fn write_artifact(
    output_dir: &Path,
    generated: &GeneratedReport,
) -> Result<PathBuf, MinutebookError> {
    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        MinutebookError::Internal(format!("cannot create {}: {e}", output_dir.display()))
    })?;
    let path = output_dir.join(&generated.filename);
    tokio::fs::write(&path, &generated.artifact.bytes)
        .await
        .map_err(|e| MinutebookError::Internal(format!("cannot write {}: {e}", path.display())))?;
    Ok(path)
}
