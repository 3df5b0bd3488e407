// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only snapshot history operations.
//!
//! Appends are single-row inserts, so concurrent editors of the same meeting
//! never overwrite each other's snapshots. `seq` is the ordering key.

use std::str::FromStr;

use minutebook_core::types::now_timestamp;
use minutebook_core::{DocumentKind, MinutebookError, NewSnapshot, SnapshotRecord};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

/// Append one snapshot. Returns its sequence number.
pub async fn insert_snapshot(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
    snapshot: &NewSnapshot,
) -> Result<i64, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    let snapshot = snapshot.clone();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO document_snapshots (id, meeting_id, kind, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    snapshot.id,
                    meeting_id,
                    kind.to_string(),
                    snapshot.body,
                    snapshot.created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Append several snapshots in order inside one transaction, skipping ids
/// that are already stored.
pub async fn import_snapshots(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
    snapshots: &[NewSnapshot],
) -> Result<usize, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    let snapshots = snapshots.to_vec();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let inserted = insert_ignoring_duplicates(&tx, &meeting_id, kind, &snapshots)?;
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert rows within an open transaction. Shared with the legacy importer.
pub(crate) fn insert_ignoring_duplicates(
    tx: &rusqlite::Transaction<'_>,
    meeting_id: &str,
    kind: DocumentKind,
    snapshots: &[NewSnapshot],
) -> Result<usize, rusqlite::Error> {
    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO document_snapshots (id, meeting_id, kind, body, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let kind = kind.to_string();
    let mut inserted = 0;
    for snapshot in snapshots {
        inserted += stmt.execute(params![
            snapshot.id,
            meeting_id,
            kind,
            snapshot.body,
            snapshot.created_at,
        ])?;
    }
    Ok(inserted)
}

/// One history in append order, optionally including removed snapshots.
pub async fn list_snapshots(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
    include_removed: bool,
) -> Result<Vec<SnapshotRecord>, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<SnapshotRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT seq, id, meeting_id, kind, body, created_at, removed_at
                 FROM document_snapshots
                 WHERE meeting_id = ?1 AND kind = ?2 AND (?3 OR removed_at IS NULL)
                 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(
                params![meeting_id, kind.to_string(), include_removed],
                record_from_row,
            )?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// The last appended snapshot that has not been removed.
pub async fn latest_snapshot(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
) -> Result<Option<SnapshotRecord>, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<SnapshotRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT seq, id, meeting_id, kind, body, created_at, removed_at
                 FROM document_snapshots
                 WHERE meeting_id = ?1 AND kind = ?2 AND removed_at IS NULL
                 ORDER BY seq DESC
                 LIMIT 1",
            )?;
            match stmt.query_row(params![meeting_id, kind.to_string()], record_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Soft-delete a snapshot. Returns `false` if no live snapshot matched.
pub async fn remove_snapshot(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
    snapshot_id: &str,
) -> Result<bool, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    let snapshot_id = snapshot_id.to_string();
    let removed_at = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE document_snapshots SET removed_at = ?1
                 WHERE id = ?2 AND meeting_id = ?3 AND kind = ?4 AND removed_at IS NULL",
                params![removed_at, snapshot_id, meeting_id, kind.to_string()],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<SnapshotRecord, rusqlite::Error> {
    let kind: String = row.get(3)?;
    let kind = DocumentKind::from_str(&kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(SnapshotRecord {
        seq: row.get(0)?,
        id: row.get(1)?,
        meeting_id: row.get(2)?,
        kind,
        body: row.get(4)?,
        created_at: row.get(5)?,
        removed_at: row.get(6)?,
    })
}
