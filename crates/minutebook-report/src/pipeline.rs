// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report pipeline: latest snapshots in, versioned artifact out.
//!
//! Generation reads the newest agenda and minutes, claims the next report
//! version, composes and rasterizes the document, and only then commits the
//! report row. A rasterizer failure leaves no trace in storage.

use std::sync::Arc;

use minutebook_config::model::ReportConfig;
use minutebook_core::{
    AgendaContent, Artifact, DeliveryAdapter, DeliveryRequest, Meeting, MinutebookError,
    MinutesContent, RasterizerAdapter, Report, StorageAdapter,
};
use minutebook_storage::{DocumentStore, ReportSequencer};
use tracing::{info, warn};

use crate::compose::{compose, escape_html, Branding, ReportDocument};

/// A freshly rendered report and its artifact.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub report: Report,
    pub document: ReportDocument,
    pub artifact: Artifact,
    /// Suggested file name, `<stem>-v<version>.<extension>`.
    pub filename: String,
}

/// Generates, regenerates and delivers meeting reports.
#[derive(Clone)]
pub struct ReportPipeline {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    agendas: DocumentStore<AgendaContent>,
    minutes: DocumentStore<MinutesContent>,
    sequencer: ReportSequencer,
    rasterizer: Arc<dyn RasterizerAdapter + Send + Sync>,
    delivery: Option<Arc<dyn DeliveryAdapter + Send + Sync>>,
    branding: Branding,
    file_stem: String,
}

impl ReportPipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        rasterizer: Arc<dyn RasterizerAdapter + Send + Sync>,
        config: &ReportConfig,
    ) -> Self {
        Self {
            agendas: DocumentStore::new(Arc::clone(&storage)),
            minutes: DocumentStore::new(Arc::clone(&storage)),
            sequencer: ReportSequencer::new(Arc::clone(&storage))
                .with_max_attempts(config.max_version_retries),
            storage,
            rasterizer,
            delivery: None,
            branding: Branding::from_config(config),
            file_stem: config.file_stem.clone(),
        }
    }

    /// Attach the gateway used by [`ReportPipeline::deliver`].
    pub fn with_delivery(mut self, delivery: Arc<dyn DeliveryAdapter + Send + Sync>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Render the next report version for a meeting and record it.
    pub async fn generate(&self, meeting_id: &str) -> Result<GeneratedReport, MinutebookError> {
        let meeting = self.require_meeting(meeting_id).await?;
        let agenda = self.agendas.latest_of(meeting_id).await?;
        let minutes = self.minutes.latest_of(meeting_id).await?;

        let (report, (document, artifact)) = self
            .sequencer
            .allocate(meeting_id, |candidate| {
                let document = compose(
                    &meeting,
                    agenda.as_ref(),
                    minutes.as_ref(),
                    candidate.version,
                    &candidate.generated_at,
                    &self.branding,
                );
                let rasterizer = Arc::clone(&self.rasterizer);
                async move {
                    let artifact = rasterizer.rasterize(&document.to_html()).await?;
                    Ok((document, artifact))
                }
            })
            .await?;

        info!(
            meeting_id,
            report_id = %report.id,
            version = report.version,
            bytes = artifact.bytes.len(),
            "report generated"
        );
        Ok(self.finish(report, document, artifact))
    }

    /// Render an existing report again from the current snapshots.
    ///
    /// Keeps the report's version and generation time and writes nothing.
    pub async fn regenerate(&self, report_id: &str) -> Result<GeneratedReport, MinutebookError> {
        let report = self.require_report(report_id).await?;
        let meeting = self.require_meeting(&report.meeting_id).await?;
        let agenda = self.agendas.latest_of(&meeting.id).await?;
        let minutes = self.minutes.latest_of(&meeting.id).await?;

        let document = compose(
            &meeting,
            agenda.as_ref(),
            minutes.as_ref(),
            report.version,
            &report.generated_at,
            &self.branding,
        );
        let artifact = self.rasterizer.rasterize(&document.to_html()).await?;
        Ok(self.finish(report, document, artifact))
    }

    /// Send a generated report and record who received it.
    ///
    /// Recipients are only recorded once the gateway accepts the message, and
    /// they replace whoever the report was delivered to before.
    /// Returns the updated report row.
    pub async fn deliver(
        &self,
        generated: &GeneratedReport,
        recipients: &[String],
    ) -> Result<Report, MinutebookError> {
        let mut unique: Vec<String> = Vec::new();
        for recipient in recipients.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            if !unique.iter().any(|u| u == recipient) {
                unique.push(recipient.to_string());
            }
        }
        if unique.is_empty() {
            return Err(MinutebookError::InvalidInput(
                "at least one recipient is required".to_string(),
            ));
        }
        let gateway = self.delivery.as_ref().ok_or_else(|| MinutebookError::Delivery {
            message: "no delivery gateway configured".to_string(),
            source: None,
        })?;

        let request = DeliveryRequest {
            subject: format!(
                "Meeting Report: {} (version {})",
                generated.document.title, generated.report.version
            ),
            body_html: cover_note(&generated.document),
            artifact: generated.artifact.clone(),
            filename: generated.filename.clone(),
            recipients: unique.clone(),
        };
        if let Err(e) = gateway.deliver(&request).await {
            warn!(
                report_id = %generated.report.id,
                gateway = gateway.name(),
                error = %e,
                "report delivery failed"
            );
            return Err(e);
        }

        self.storage
            .record_delivery(&generated.report.id, &unique)
            .await?;
        info!(
            report_id = %generated.report.id,
            recipients = unique.len(),
            "report delivered"
        );
        self.require_report(&generated.report.id).await
    }

    /// Every report generated for a meeting, oldest version first.
    pub async fn reports(&self, meeting_id: &str) -> Result<Vec<Report>, MinutebookError> {
        self.require_meeting(meeting_id).await?;
        self.storage.list_reports(meeting_id).await
    }

    fn finish(&self, report: Report, document: ReportDocument, artifact: Artifact) -> GeneratedReport {
        let filename = format!("{}-v{}.{}", self.file_stem, report.version, artifact.extension);
        GeneratedReport {
            report,
            document,
            artifact,
            filename,
        }
    }

    async fn require_meeting(&self, meeting_id: &str) -> Result<Meeting, MinutebookError> {
        self.storage
            .get_meeting(meeting_id)
            .await?
            .ok_or_else(|| MinutebookError::MeetingNotFound {
                meeting_id: meeting_id.to_string(),
            })
    }

    async fn require_report(&self, report_id: &str) -> Result<Report, MinutebookError> {
        self.storage
            .get_report(report_id)
            .await?
            .ok_or_else(|| MinutebookError::ReportNotFound {
                report_id: report_id.to_string(),
            })
    }
}

fn cover_note(document: &ReportDocument) -> String {
    format!(
        "<p>Please find attached version {} of the meeting report for <strong>{}</strong>.</p>\n\
         <p>{}</p>\n",
        document.version,
        escape_html(&document.title),
        escape_html(&document.organization)
    )
}
