// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring from configuration to storage, rasterizer and delivery adapters.

use std::sync::Arc;

use minutebook_config::MinutebookConfig;
use minutebook_core::{MinutebookError, StorageAdapter};
use minutebook_email::SmtpDelivery;
use minutebook_report::{rasterizer, ReportPipeline};
use minutebook_storage::SqliteStorage;
use tracing::debug;

pub struct App {
    pub config: MinutebookConfig,
    sqlite: Arc<SqliteStorage>,
}

impl App {
    /// Open the configured database, running migrations and the inline
    /// history import.
    pub async fn open(config: MinutebookConfig) -> Result<Self, MinutebookError> {
        let sqlite = SqliteStorage::new(config.storage.clone());
        sqlite.initialize().await?;
        Ok(Self {
            config,
            sqlite: Arc::new(sqlite),
        })
    }

    pub fn storage(&self) -> Arc<dyn StorageAdapter + Send + Sync> {
        self.sqlite.clone()
    }

    /// The report pipeline, with SMTP delivery attached when a relay is set.
    pub fn pipeline(&self) -> Result<ReportPipeline, MinutebookError> {
        let rasterizer = rasterizer::from_config(&self.config.report)?;
        let pipeline = ReportPipeline::new(self.storage(), rasterizer, &self.config.report);
        if self.config.smtp.is_enabled() {
            let delivery = SmtpDelivery::from_config(&self.config.smtp)?;
            Ok(pipeline.with_delivery(Arc::new(delivery)))
        } else {
            debug!("no SMTP relay configured, delivery disabled");
            Ok(pipeline)
        }
    }

    pub async fn close(&self) -> Result<(), MinutebookError> {
        self.sqlite.close().await
    }
}
