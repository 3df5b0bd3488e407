// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use minutebook_config::model::StorageConfig;
use minutebook_core::{
    AdapterType, DocumentKind, HealthStatus, Meeting, MinutebookError, NewSnapshot,
    PluginAdapter, Report, SnapshotRecord, StorageAdapter,
};

use crate::database::{map_tr_err, Database};
use crate::queries;
use crate::queries::legacy::LegacyImport;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`], which also imports any inline histories
/// left by older versions.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, MinutebookError> {
        self.db
            .get()
            .ok_or_else(|| MinutebookError::storage("storage not initialized -- call initialize() first"))
    }

    /// Run the inline history import again. `initialize` already does this once.
    pub async fn import_legacy_histories(&self) -> Result<LegacyImport, MinutebookError> {
        queries::legacy::import_inline_histories(self.db()?).await
    }

    /// Overwrite a meeting's inline history column.
    pub async fn set_legacy_history(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        text: &str,
    ) -> Result<(), MinutebookError> {
        queries::legacy::set_inline_history(self.db()?, meeting_id, kind, text).await
    }

    /// A meeting's inline history column, `None` if the meeting does not exist.
    pub async fn legacy_history(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
    ) -> Result<Option<String>, MinutebookError> {
        queries::legacy::inline_history(self.db()?, meeting_id, kind).await
    }

    async fn checkpoint(db: &Database) -> Result<(), MinutebookError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MinutebookError> {
        let db = self.db()?;
        let integrity = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA quick_check;", [], |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;
        if integrity == "ok" {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(integrity))
        }
    }

    async fn shutdown(&self) -> Result<(), MinutebookError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MinutebookError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with_options(&path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| MinutebookError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");

        self.import_legacy_histories().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), MinutebookError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Meetings ---

    async fn create_meeting(&self, meeting: &Meeting) -> Result<(), MinutebookError> {
        queries::meetings::create_meeting(self.db()?, meeting).await
    }

    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, MinutebookError> {
        queries::meetings::get_meeting(self.db()?, id).await
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>, MinutebookError> {
        queries::meetings::list_meetings(self.db()?).await
    }

    async fn delete_meeting(&self, id: &str) -> Result<bool, MinutebookError> {
        queries::meetings::delete_meeting(self.db()?, id).await
    }

    // --- Snapshots ---

    async fn insert_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshot: &NewSnapshot,
    ) -> Result<i64, MinutebookError> {
        queries::snapshots::insert_snapshot(self.db()?, meeting_id, kind, snapshot).await
    }

    async fn import_snapshots(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshots: &[NewSnapshot],
    ) -> Result<usize, MinutebookError> {
        queries::snapshots::import_snapshots(self.db()?, meeting_id, kind, snapshots).await
    }

    async fn list_snapshots(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        include_removed: bool,
    ) -> Result<Vec<SnapshotRecord>, MinutebookError> {
        queries::snapshots::list_snapshots(self.db()?, meeting_id, kind, include_removed).await
    }

    async fn latest_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
    ) -> Result<Option<SnapshotRecord>, MinutebookError> {
        queries::snapshots::latest_snapshot(self.db()?, meeting_id, kind).await
    }

    async fn remove_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshot_id: &str,
    ) -> Result<bool, MinutebookError> {
        queries::snapshots::remove_snapshot(self.db()?, meeting_id, kind, snapshot_id).await
    }

    // --- Reports ---

    async fn next_report_version(&self, meeting_id: &str) -> Result<u32, MinutebookError> {
        queries::reports::next_version(self.db()?, meeting_id).await
    }

    async fn insert_report(&self, report: &Report) -> Result<(), MinutebookError> {
        queries::reports::insert_report(self.db()?, report).await
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>, MinutebookError> {
        queries::reports::get_report(self.db()?, id).await
    }

    async fn list_reports(&self, meeting_id: &str) -> Result<Vec<Report>, MinutebookError> {
        queries::reports::list_reports(self.db()?, meeting_id).await
    }

    async fn record_delivery(
        &self,
        report_id: &str,
        recipients: &[String],
    ) -> Result<(), MinutebookError> {
        queries::reports::record_delivery(self.db()?, report_id, recipients).await
    }
}
