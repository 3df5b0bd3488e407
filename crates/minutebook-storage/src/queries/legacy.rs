// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time import of inline snapshot histories into `document_snapshots`.
//!
//! Older databases kept each history as encoded text in
//! `meetings.agenda_history` / `meetings.minutes_history`. Readable histories
//! are moved into the snapshot table (ids and order preserved) and the inline
//! column is cleared in the same transaction. Free-form notes that were never
//! a history are left where they are and noted in `legacy_unrecognized`, so
//! later passes only warn again when the text has changed.

use minutebook_core::codec::{self, PayloadState};
use minutebook_core::{
    AgendaContent, DocumentBody, DocumentKind, MinutebookError, MinutesContent, NewSnapshot,
};
use rusqlite::{params, OptionalExtension, Transaction};
use tracing::{debug, info, warn};

use crate::database::{map_tr_err, Database};
use crate::queries::snapshots::insert_ignoring_duplicates;

/// Totals from one legacy import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyImport {
    /// Meetings that had at least one history moved.
    pub meetings: usize,
    /// Snapshot rows inserted.
    pub snapshots: usize,
    /// Inline fields left in place because they were not a history.
    pub unrecognized: usize,
}

/// What to do with one inline field.
enum FieldPlan {
    Skip,
    Import(Vec<NewSnapshot>),
    Unrecognized,
}

/// An inline field left in place, and whether this pass saw it first.
struct LeftInPlace {
    meeting_id: String,
    kind: DocumentKind,
    first_seen: bool,
}

/// Move every readable inline history into the snapshot table.
pub async fn import_inline_histories(db: &Database) -> Result<LegacyImport, MinutebookError> {
    let (mut summary, left_in_place) = db
        .connection()
        .call(
            |conn| -> Result<(LegacyImport, Vec<LeftInPlace>), rusqlite::Error> {
                let pending: Vec<(String, String, String)> = {
                    let mut stmt = conn.prepare(
                        "SELECT id, agenda_history, minutes_history FROM meetings
                         WHERE agenda_history != '' OR minutes_history != ''",
                    )?;
                    let rows =
                        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
                    rows.collect::<Result<_, _>>()?
                };

                let mut summary = LegacyImport::default();
                let mut left_in_place = Vec::new();
                for (meeting_id, agenda_text, minutes_text) in pending {
                    let tx = conn.transaction()?;
                    let mut moved = false;
                    let fields = [
                        (
                            DocumentKind::Agenda,
                            &agenda_text,
                            plan::<AgendaContent>(&agenda_text),
                        ),
                        (
                            DocumentKind::Minutes,
                            &minutes_text,
                            plan::<MinutesContent>(&minutes_text),
                        ),
                    ];
                    for (kind, text, field_plan) in fields {
                        match field_plan {
                            FieldPlan::Skip => {}
                            FieldPlan::Unrecognized => {
                                let first_seen = note_unrecognized(&tx, &meeting_id, kind, text)?;
                                left_in_place.push(LeftInPlace {
                                    meeting_id: meeting_id.clone(),
                                    kind,
                                    first_seen,
                                });
                            }
                            FieldPlan::Import(rows) => {
                                summary.snapshots +=
                                    insert_ignoring_duplicates(&tx, &meeting_id, kind, &rows)?;
                                let column = inline_column(kind);
                                tx.execute(
                                    &format!("UPDATE meetings SET {column} = '' WHERE id = ?1"),
                                    params![meeting_id],
                                )?;
                                moved = true;
                            }
                        }
                    }
                    tx.commit()?;
                    if moved {
                        summary.meetings += 1;
                    }
                }
                Ok((summary, left_in_place))
            },
        )
        .await
        .map_err(map_tr_err)?;

    for field in &left_in_place {
        if field.first_seen {
            warn!(
                meeting_id = %field.meeting_id,
                kind = %field.kind,
                "inline history is not a snapshot history, leaving it in place"
            );
        } else {
            debug!(
                meeting_id = %field.meeting_id,
                kind = %field.kind,
                "inline history already noted as unrecognized"
            );
        }
    }
    summary.unrecognized = left_in_place.len();

    if summary.meetings > 0 {
        info!(
            meetings = summary.meetings,
            snapshots = summary.snapshots,
            "imported inline document histories"
        );
    }
    Ok(summary)
}

/// Write an inline history column directly. Used to stage databases from
/// before the snapshot table existed.
pub async fn set_inline_history(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
    text: &str,
) -> Result<(), MinutebookError> {
    let id = meeting_id.to_string();
    let text = text.to_string();
    let column = inline_column(kind);
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                &format!("UPDATE meetings SET {column} = ?1 WHERE id = ?2"),
                params![text, id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(MinutebookError::MeetingNotFound {
            meeting_id: meeting_id.to_string(),
        });
    }
    Ok(())
}

/// Read an inline history column.
pub async fn inline_history(
    db: &Database,
    meeting_id: &str,
    kind: DocumentKind,
) -> Result<Option<String>, MinutebookError> {
    let id = meeting_id.to_string();
    let column = inline_column(kind);
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            match conn.query_row(
                &format!("SELECT {column} FROM meetings WHERE id = ?1"),
                params![id],
                |row| row.get(0),
            ) {
                Ok(text) => Ok(Some(text)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

fn inline_column(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Agenda => "agenda_history",
        DocumentKind::Minutes => "minutes_history",
    }
}

/// Remember an unreadable inline field. Returns `true` when this text has not
/// been noted for the field before.
fn note_unrecognized(
    tx: &Transaction<'_>,
    meeting_id: &str,
    kind: DocumentKind,
    text: &str,
) -> Result<bool, rusqlite::Error> {
    let kind = kind.to_string();
    let noted: Option<String> = tx
        .query_row(
            "SELECT payload FROM legacy_unrecognized WHERE meeting_id = ?1 AND kind = ?2",
            params![meeting_id, kind],
            |row| row.get(0),
        )
        .optional()?;
    if noted.as_deref() == Some(text) {
        return Ok(false);
    }
    tx.execute(
        "INSERT INTO legacy_unrecognized (meeting_id, kind, payload) VALUES (?1, ?2, ?3)
         ON CONFLICT (meeting_id, kind) DO UPDATE SET
             payload = excluded.payload,
             noted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![meeting_id, kind, text],
    )?;
    Ok(true)
}

fn plan<B: DocumentBody>(text: &str) -> FieldPlan {
    match codec::inspect::<B>(text) {
        PayloadState::Blank => FieldPlan::Skip,
        PayloadState::Unrecognized => FieldPlan::Unrecognized,
        PayloadState::Snapshots(_) => {
            let rows = codec::decode::<B>(text)
                .iter()
                .filter_map(|snapshot| snapshot.to_row().ok())
                .collect();
            FieldPlan::Import(rows)
        }
    }
}
