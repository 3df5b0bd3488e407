// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report audit trail operations.

use minutebook_core::{MinutebookError, Report};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

/// What happened to an insert attempt.
enum InsertOutcome {
    Inserted,
    DuplicateVersion,
}

/// `MAX(version) + 1` for the meeting, or 1 when it has no reports yet.
pub async fn next_version(db: &Database, meeting_id: &str) -> Result<u32, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            let next: i64 = conn.query_row(
                "SELECT COALESCE(MAX(version), 0) + 1 FROM reports WHERE meeting_id = ?1",
                params![meeting_id],
                |row| row.get(0),
            )?;
            u32::try_from(next).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, next))
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a report row, reporting a taken `(meeting_id, version)` pair as
/// [`MinutebookError::VersionConflict`].
pub async fn insert_report(db: &Database, report: &Report) -> Result<(), MinutebookError> {
    let row = report.clone();
    let delivered_to = encode_recipients(&report.delivered_to)?;
    let outcome = db
        .connection()
        .call(move |conn| -> Result<InsertOutcome, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO reports (id, meeting_id, version, generated_at, delivered_to)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.id,
                    row.meeting_id,
                    row.version,
                    row.generated_at,
                    delivered_to,
                ],
            );
            match result {
                Ok(_) => Ok(InsertOutcome::Inserted),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Ok(InsertOutcome::DuplicateVersion)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        InsertOutcome::Inserted => Ok(()),
        InsertOutcome::DuplicateVersion => Err(MinutebookError::VersionConflict {
            meeting_id: report.meeting_id.clone(),
            version: report.version,
        }),
    }
}

/// Get a report by ID.
pub async fn get_report(db: &Database, id: &str) -> Result<Option<Report>, MinutebookError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Report>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, meeting_id, version, generated_at, delivered_to
                 FROM reports WHERE id = ?1",
            )?;
            match stmt.query_row(params![id], report_from_row) {
                Ok(report) => Ok(Some(report)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Reports of a meeting, lowest version first.
pub async fn list_reports(db: &Database, meeting_id: &str) -> Result<Vec<Report>, MinutebookError> {
    let meeting_id = meeting_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Report>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, meeting_id, version, generated_at, delivered_to
                 FROM reports WHERE meeting_id = ?1 ORDER BY version ASC",
            )?;
            let rows = stmt.query_map(params![meeting_id], report_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace a report's delivery list with the recipients of its latest
/// delivery. Duplicates are dropped, first occurrence wins.
pub async fn record_delivery(
    db: &Database,
    report_id: &str,
    recipients: &[String],
) -> Result<(), MinutebookError> {
    let mut delivered: Vec<String> = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        if !delivered.contains(recipient) {
            delivered.push(recipient.clone());
        }
    }
    let encoded = encode_recipients(&delivered)?;
    let id = report_id.to_string();
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE reports SET delivered_to = ?1 WHERE id = ?2",
                params![encoded, id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if updated > 0 {
        Ok(())
    } else {
        Err(MinutebookError::ReportNotFound {
            report_id: report_id.to_string(),
        })
    }
}

fn encode_recipients(recipients: &[String]) -> Result<String, MinutebookError> {
    serde_json::to_string(recipients).map_err(MinutebookError::storage)
}

fn decode_recipients(text: &str, column: usize) -> Result<Vec<String>, rusqlite::Error> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn report_from_row(row: &rusqlite::Row<'_>) -> Result<Report, rusqlite::Error> {
    let delivered_to: String = row.get(4)?;
    Ok(Report {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        version: row.get(2)?,
        generated_at: row.get(3)?,
        delivered_to: decode_recipients(&delivered_to, 4)?,
    })
}
