// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::MinutebookError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{DocumentKind, Meeting, NewSnapshot, Report, SnapshotRecord};

/// Adapter for the persistence layer behind meetings, snapshots and reports.
///
/// Snapshot bodies cross this boundary as JSON text; typed access lives in
/// the document store built on top of it.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, legacy import).
    async fn initialize(&self) -> Result<(), MinutebookError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MinutebookError>;

    // --- Meetings ---

    /// Insert a new meeting row.
    async fn create_meeting(&self, meeting: &Meeting) -> Result<(), MinutebookError>;

    /// Fetch a meeting by id.
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, MinutebookError>;

    /// All meetings, soonest scheduled first.
    async fn list_meetings(&self) -> Result<Vec<Meeting>, MinutebookError>;

    /// Delete a meeting together with its snapshots and reports.
    ///
    /// Returns `false` when no such meeting existed.
    async fn delete_meeting(&self, id: &str) -> Result<bool, MinutebookError>;

    // --- Snapshots ---

    /// Append a snapshot row and return its append sequence number.
    async fn insert_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshot: &NewSnapshot,
    ) -> Result<i64, MinutebookError>;

    /// Append several snapshots in order within one transaction.
    ///
    /// Snapshots whose id is already stored are skipped. Returns how many
    /// were inserted.
    async fn import_snapshots(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshots: &[NewSnapshot],
    ) -> Result<usize, MinutebookError>;

    /// Snapshots of one history in append order.
    async fn list_snapshots(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        include_removed: bool,
    ) -> Result<Vec<SnapshotRecord>, MinutebookError>;

    /// The last appended snapshot that has not been removed.
    async fn latest_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
    ) -> Result<Option<SnapshotRecord>, MinutebookError>;

    /// Mark a snapshot removed. Returns `false` if it was not found.
    async fn remove_snapshot(
        &self,
        meeting_id: &str,
        kind: DocumentKind,
        snapshot_id: &str,
    ) -> Result<bool, MinutebookError>;

    // --- Reports ---

    /// The version the next report for this meeting should take.
    async fn next_report_version(&self, meeting_id: &str) -> Result<u32, MinutebookError>;

    /// Insert a report row.
    ///
    /// Fails with [`MinutebookError::VersionConflict`] if the meeting already
    /// has a report with the same version.
    async fn insert_report(&self, report: &Report) -> Result<(), MinutebookError>;

    /// Fetch a report by id.
    async fn get_report(&self, id: &str) -> Result<Option<Report>, MinutebookError>;

    /// Reports of a meeting, lowest version first.
    async fn list_reports(&self, meeting_id: &str) -> Result<Vec<Report>, MinutebookError>;

    /// Record the recipients a report was last delivered to.
    async fn record_delivery(
        &self,
        report_id: &str,
        recipients: &[String],
    ) -> Result<(), MinutebookError>;
}
