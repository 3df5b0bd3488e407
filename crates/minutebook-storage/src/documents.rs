// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned document store: typed access to a meeting's agenda or minutes
//! history.
//!
//! The body type picks the history, so `DocumentStore<AgendaContent>` can only
//! ever touch agenda snapshots.

use std::marker::PhantomData;
use std::sync::Arc;

use minutebook_core::codec;
use minutebook_core::{DocumentBody, MinutebookError, Snapshot, SnapshotRecord, StorageAdapter};
use tracing::{info, warn};

/// A snapshot together with its removal marker.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<B> {
    pub snapshot: Snapshot<B>,
    pub removed_at: Option<String>,
}

/// Append-only history store for one document kind.
pub struct DocumentStore<B> {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    _body: PhantomData<fn() -> B>,
}

impl<B> Clone for DocumentStore<B> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            _body: PhantomData,
        }
    }
}

impl<B: DocumentBody> DocumentStore<B> {
    pub fn new(storage: Arc<dyn StorageAdapter + Send + Sync>) -> Self {
        Self {
            storage,
            _body: PhantomData,
        }
    }

    /// Record a new snapshot with a fresh id and the current time.
    pub async fn append(&self, meeting_id: &str, body: B) -> Result<Snapshot<B>, MinutebookError> {
        self.require_meeting(meeting_id).await?;
        let snapshot = Snapshot::new(body);
        let row = snapshot.to_row().map_err(MinutebookError::storage)?;
        let seq = self.storage.insert_snapshot(meeting_id, B::KIND, &row).await?;
        info!(
            meeting_id,
            kind = %B::KIND,
            snapshot_id = %snapshot.id,
            seq,
            "snapshot appended"
        );
        Ok(snapshot)
    }

    /// Remove a snapshot from the visible history.
    ///
    /// Unknown ids are not an error; the return value says whether anything
    /// was removed.
    pub async fn remove(&self, meeting_id: &str, snapshot_id: &str) -> Result<bool, MinutebookError> {
        let removed = self
            .storage
            .remove_snapshot(meeting_id, B::KIND, snapshot_id)
            .await?;
        if removed {
            info!(meeting_id, kind = %B::KIND, snapshot_id, "snapshot removed");
        }
        Ok(removed)
    }

    /// The current document: the last appended snapshot still visible.
    ///
    /// Always the last element of [`all_of`](Self::all_of). An unreadable
    /// newest row falls back to the latest one that still decodes.
    pub async fn latest_of(&self, meeting_id: &str) -> Result<Option<Snapshot<B>>, MinutebookError> {
        let Some(record) = self.storage.latest_snapshot(meeting_id, B::KIND).await? else {
            return Ok(None);
        };
        if let Some(snapshot) = decode_record(&record) {
            return Ok(Some(snapshot));
        }
        Ok(self.all_of(meeting_id).await?.pop())
    }

    /// The visible history in append order.
    pub async fn all_of(&self, meeting_id: &str) -> Result<Vec<Snapshot<B>>, MinutebookError> {
        let records = self.storage.list_snapshots(meeting_id, B::KIND, false).await?;
        Ok(records.iter().filter_map(decode_record).collect())
    }

    /// Every snapshot ever appended, removed ones included, in append order.
    pub async fn all_including_removed(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<HistoryEntry<B>>, MinutebookError> {
        let records = self.storage.list_snapshots(meeting_id, B::KIND, true).await?;
        Ok(records
            .iter()
            .filter_map(|record| {
                decode_record(record).map(|snapshot| HistoryEntry {
                    snapshot,
                    removed_at: record.removed_at.clone(),
                })
            })
            .collect())
    }

    /// The visible history in the portable encoded form.
    pub async fn export(&self, meeting_id: &str) -> Result<String, MinutebookError> {
        self.require_meeting(meeting_id).await?;
        Ok(codec::encode(&self.all_of(meeting_id).await?))
    }

    /// Append every snapshot of an encoded history, keeping ids and times.
    ///
    /// Unreadable text imports nothing. Snapshots already present are skipped.
    pub async fn import(&self, meeting_id: &str, text: &str) -> Result<usize, MinutebookError> {
        self.require_meeting(meeting_id).await?;
        let rows = codec::decode::<B>(text)
            .iter()
            .map(Snapshot::to_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(MinutebookError::storage)?;
        if rows.is_empty() {
            return Ok(0);
        }
        let imported = self
            .storage
            .import_snapshots(meeting_id, B::KIND, &rows)
            .await?;
        info!(meeting_id, kind = %B::KIND, imported, offered = rows.len(), "history imported");
        Ok(imported)
    }

    async fn require_meeting(&self, meeting_id: &str) -> Result<(), MinutebookError> {
        match self.storage.get_meeting(meeting_id).await? {
            Some(_) => Ok(()),
            None => Err(MinutebookError::MeetingNotFound {
                meeting_id: meeting_id.to_string(),
            }),
        }
    }
}

fn decode_record<B: DocumentBody>(record: &SnapshotRecord) -> Option<Snapshot<B>> {
    match Snapshot::from_record(record) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(
                snapshot_id = %record.id,
                kind = %record.kind,
                error = %e,
                "stored snapshot body unreadable, skipping"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteStorage;
    use chrono::Utc;
    use minutebook_config::model::StorageConfig;
    use minutebook_core::{
        ActionItem, AgendaContent, DocumentKind, MeetingMode, MinutesContent, NewMeeting,
        NewSnapshot,
    };
    use tempfile::tempdir;

    async fn setup() -> (Arc<dyn StorageAdapter + Send + Sync>, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("docs.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        let meeting = NewMeeting {
            title: "Sprint planning".to_string(),
            scheduled_at: Utc::now(),
            mode: MeetingMode::InPerson,
            join_link: None,
            owner: "ana@example.com".to_string(),
        }
        .into_meeting();
        storage.create_meeting(&meeting).await.unwrap();
        (Arc::new(storage), meeting.id, dir)
    }

    fn agenda(objectives: &str) -> AgendaContent {
        AgendaContent {
            objectives: objectives.to_string(),
            ..AgendaContent::default()
        }
    }

    #[tokio::test]
    async fn latest_tracks_the_last_append() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage);

        assert!(store.latest_of(&meeting_id).await.unwrap().is_none());
        store.append(&meeting_id, agenda("Kickoff")).await.unwrap();
        let second = store.append(&meeting_id, agenda("Kickoff v2")).await.unwrap();

        let latest = store.latest_of(&meeting_id).await.unwrap().unwrap();
        assert_eq!(latest, second);
        let all = store.all_of(&meeting_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].body.objectives, "Kickoff");
    }

    #[tokio::test]
    async fn unreadable_newest_row_falls_back_to_the_last_readable_one() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage.clone());
        let readable = store.append(&meeting_id, agenda("A1")).await.unwrap();
        storage
            .insert_snapshot(
                &meeting_id,
                DocumentKind::Agenda,
                &NewSnapshot {
                    id: "corrupt".to_string(),
                    body: r#"{"items":5}"#.to_string(),
                    created_at: Utc::now().to_rfc3339(),
                },
            )
            .await
            .unwrap();

        let all = store.all_of(&meeting_id).await.unwrap();
        assert_eq!(all, vec![readable.clone()]);
        assert_eq!(store.latest_of(&meeting_id).await.unwrap(), Some(readable));
    }

    #[tokio::test]
    async fn appended_snapshot_reads_back_unchanged() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<MinutesContent>::new(storage);
        let body = MinutesContent {
            attendees: vec!["Ana".to_string()],
            discussion: "Hiring".to_string(),
            decisions: vec![],
            action_items: vec![ActionItem {
                task: "Post role".to_string(),
                assignee: "Ana".to_string(),
                due_date: None,
            }],
            next_meeting: None,
        };
        let appended = store.append(&meeting_id, body.clone()).await.unwrap();
        let read = store.latest_of(&meeting_id).await.unwrap().unwrap();
        assert_eq!(read.body, body);
        assert_eq!(read.id, appended.id);
        assert_eq!(read.created_at, appended.created_at);
    }

    #[tokio::test]
    async fn kinds_do_not_leak_into_each_other() {
        let (storage, meeting_id, _dir) = setup().await;
        let agendas = DocumentStore::<AgendaContent>::new(storage.clone());
        let minutes = DocumentStore::<MinutesContent>::new(storage);

        agendas.append(&meeting_id, agenda("Only agenda")).await.unwrap();
        assert!(minutes.latest_of(&meeting_id).await.unwrap().is_none());
        assert!(minutes.all_of(&meeting_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_to_unknown_meeting_fails() {
        let (storage, _meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage);
        let err = store.append("ghost", agenda("x")).await.unwrap_err();
        assert!(matches!(err, MinutebookError::MeetingNotFound { .. }));
    }

    #[tokio::test]
    async fn remove_hides_snapshot_and_ignores_unknown_ids() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage);
        let first = store.append(&meeting_id, agenda("A1")).await.unwrap();
        let second = store.append(&meeting_id, agenda("A2")).await.unwrap();

        assert!(!store.remove(&meeting_id, "no-such-id").await.unwrap());
        assert_eq!(store.all_of(&meeting_id).await.unwrap().len(), 2);

        assert!(store.remove(&meeting_id, &second.id).await.unwrap());
        assert_eq!(store.latest_of(&meeting_id).await.unwrap().unwrap(), first);

        let audit = store.all_including_removed(&meeting_id).await.unwrap();
        assert_eq!(audit.len(), 2);
        assert!(audit[0].removed_at.is_none());
        assert!(audit[1].removed_at.is_some());
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let meeting_id = meeting_id.clone();
            handles.push(tokio::spawn(async move {
                store.append(&meeting_id, agenda(&format!("edit {i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.all_of(&meeting_id).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn export_then_import_into_another_meeting() {
        let (storage, meeting_id, _dir) = setup().await;
        let store = DocumentStore::<AgendaContent>::new(storage.clone());
        store.append(&meeting_id, agenda("A1")).await.unwrap();
        store.append(&meeting_id, agenda("A2")).await.unwrap();
        let exported = store.export(&meeting_id).await.unwrap();

        // Re-importing into the same meeting adds nothing.
        assert_eq!(store.import(&meeting_id, &exported).await.unwrap(), 0);
        assert_eq!(store.import(&meeting_id, "not a history").await.unwrap(), 0);
        assert_eq!(store.all_of(&meeting_id).await.unwrap().len(), 2);

        let follow_up = NewMeeting {
            title: "Sprint planning, part 2".to_string(),
            scheduled_at: Utc::now(),
            mode: MeetingMode::Remote,
            join_link: None,
            owner: "ana@example.com".to_string(),
        }
        .into_meeting();
        storage.create_meeting(&follow_up).await.unwrap();
        assert_eq!(store.import(&follow_up.id, &exported).await.unwrap(), 2);
        let copied = store.all_of(&follow_up.id).await.unwrap();
        assert_eq!(copied, store.all_of(&meeting_id).await.unwrap());

        let err = store.import("ghost", &exported).await.unwrap_err();
        assert!(matches!(err, MinutebookError::MeetingNotFound { .. }));
    }
}
