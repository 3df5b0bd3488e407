// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting CRUD operations.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use minutebook_core::{Meeting, MeetingMode, MinutebookError};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{map_tr_err, Database};

const MEETING_COLUMNS: &str = "id, title, scheduled_at, mode, join_link, owner, created_at";

/// Create a new meeting.
pub async fn create_meeting(db: &Database, meeting: &Meeting) -> Result<(), MinutebookError> {
    let meeting = meeting.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO meetings (id, title, scheduled_at, mode, join_link, owner, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    meeting.id,
                    meeting.title,
                    format_scheduled_at(&meeting.scheduled_at),
                    meeting.mode.to_string(),
                    meeting.join_link,
                    meeting.owner,
                    meeting.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a meeting by ID.
pub async fn get_meeting(db: &Database, id: &str) -> Result<Option<Meeting>, MinutebookError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Meeting>, rusqlite::Error> {
            let sql = format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            match stmt.query_row(params![id], meeting_from_row) {
                Ok(meeting) => Ok(Some(meeting)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all meetings, soonest scheduled first.
pub async fn list_meetings(db: &Database) -> Result<Vec<Meeting>, MinutebookError> {
    db.connection()
        .call(|conn| -> Result<Vec<Meeting>, rusqlite::Error> {
            let sql = format!(
                "SELECT {MEETING_COLUMNS} FROM meetings ORDER BY scheduled_at ASC, created_at ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], meeting_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a meeting. Snapshots and reports go with it via `ON DELETE CASCADE`.
pub async fn delete_meeting(db: &Database, id: &str) -> Result<bool, MinutebookError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute("DELETE FROM meetings WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Canonical text form of a scheduled time. Sorts lexically in time order.
pub(crate) fn format_scheduled_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn meeting_from_row(row: &rusqlite::Row<'_>) -> Result<Meeting, rusqlite::Error> {
    let scheduled_at: String = row.get(2)?;
    let scheduled_at = DateTime::parse_from_rfc3339(&scheduled_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    let mode: String = row.get(3)?;
    let mode = MeetingMode::from_str(&mode)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Meeting {
        id: row.get(0)?,
        title: row.get(1)?,
        scheduled_at,
        mode,
        join_link: row.get(4)?,
        owner: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use minutebook_core::NewMeeting;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn meeting(title: &str, day: u32) -> Meeting {
        NewMeeting {
            title: title.to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).unwrap(),
            mode: MeetingMode::Remote,
            join_link: Some("https://meet.example.com/abc".to_string()),
            owner: "ana@example.com".to_string(),
        }
        .into_meeting()
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let (db, _dir) = setup_db().await;
        let m = meeting("Quarterly review", 10);
        create_meeting(&db, &m).await.unwrap();

        let loaded = get_meeting(&db, &m.id).await.unwrap().unwrap();
        assert_eq!(loaded, m);
        assert!(get_meeting(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_orders_by_schedule() {
        let (db, _dir) = setup_db().await;
        let later = meeting("Later", 20);
        let sooner = meeting("Sooner", 5);
        create_meeting(&db, &later).await.unwrap();
        create_meeting(&db, &sooner).await.unwrap();

        let titles: Vec<String> = list_meetings(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let (db, _dir) = setup_db().await;
        let m = meeting("Standup", 1);
        create_meeting(&db, &m).await.unwrap();

        assert!(delete_meeting(&db, &m.id).await.unwrap());
        assert!(!delete_meeting(&db, &m.id).await.unwrap());
        db.close().await.unwrap();
    }
}
