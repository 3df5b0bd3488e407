// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for integration testing.
//!
//! `TestHarness` opens a fresh SQLite database in a temp directory and hands
//! out the storage adapter plus a report configuration that writes into the
//! same directory.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use minutebook_config::model::{ReportConfig, StorageConfig};
use minutebook_core::{Meeting, MeetingMode, MinutebookError, NewMeeting, StorageAdapter};
use minutebook_storage::SqliteStorage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    wal_mode: bool,
    organization: Option<String>,
    max_version_retries: Option<u32>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            wal_mode: true,
            organization: None,
            max_version_retries: None,
        }
    }

    /// Toggle WAL mode on the temp database.
    pub fn with_wal_mode(mut self, wal_mode: bool) -> Self {
        self.wal_mode = wal_mode;
        self
    }

    /// Set the organization printed in report headers.
    pub fn with_organization(mut self, organization: &str) -> Self {
        self.organization = Some(organization.to_string());
        self
    }

    /// Set how many version collisions a generation tolerates.
    pub fn with_max_version_retries(mut self, retries: u32) -> Self {
        self.max_version_retries = Some(retries);
        self
    }

    /// Build the test harness, creating and initializing the temp database.
    pub async fn build(self) -> Result<TestHarness, MinutebookError> {
        let temp_dir = tempfile::TempDir::new().map_err(MinutebookError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: self.wal_mode,
        });
        storage.initialize().await?;
        let sqlite = Arc::new(storage);
        let storage: Arc<dyn StorageAdapter + Send + Sync> = sqlite.clone();

        let defaults = ReportConfig::default();
        let report_config = ReportConfig {
            organization: self.organization.unwrap_or(defaults.organization.clone()),
            max_version_retries: self
                .max_version_retries
                .unwrap_or(defaults.max_version_retries),
            output_dir: temp_dir.path().to_string_lossy().to_string(),
            ..defaults
        };

        Ok(TestHarness {
            storage,
            sqlite,
            report_config,
            _temp_dir: temp_dir,
        })
    }
}

/// A temp-database test environment.
pub struct TestHarness {
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// The same adapter with its concrete type, for legacy-history helpers.
    pub sqlite: Arc<SqliteStorage>,
    /// Report settings pointing at the temp directory.
    pub report_config: ReportConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Directory holding the database and any written artifacts.
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }

    /// A fixed, reproducible meeting time: Tuesday 7 April 2026, 14:00 UTC.
    pub fn meeting_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 7, 14, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Store a remote meeting with the given title.
    pub async fn create_meeting(&self, title: &str) -> Result<Meeting, MinutebookError> {
        let meeting = NewMeeting {
            title: title.to_string(),
            scheduled_at: Self::meeting_time(),
            mode: MeetingMode::Remote,
            join_link: Some("https://meet.example.com/room".to_string()),
            owner: "organizer@example.com".to_string(),
        }
        .into_meeting();
        self.storage.create_meeting(&meeting).await?;
        Ok(meeting)
    }
}
