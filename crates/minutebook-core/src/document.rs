// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agenda and minutes document bodies, and the immutable snapshot wrapper.
//!
//! Field names serialize in camelCase, the shape web clients submit and the
//! shape stored inside encoded snapshot histories.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{now_timestamp, DocumentKind, NewSnapshot, SnapshotRecord};

/// A document body that can be versioned as a snapshot history.
pub trait DocumentBody:
    Serialize + DeserializeOwned + Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Which history of a meeting this body belongs to.
    const KIND: DocumentKind;
}

/// One entry on an agenda.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub presenter: String,
    #[serde(default)]
    pub duration_minutes: u32,
}

/// A task assigned to someone, with an optional due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Agenda document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaContent {
    #[serde(default)]
    pub objectives: String,
    /// Preparation items; the report lists these as risks.
    #[serde(default)]
    pub preparation: Vec<String>,
    #[serde(default)]
    pub items: Vec<AgendaItem>,
    /// Pre-meeting action items.
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

impl DocumentBody for AgendaContent {
    const KIND: DocumentKind = DocumentKind::Agenda;
}

/// Minutes document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinutesContent {
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub discussion: String,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub next_meeting: Option<String>,
}

impl DocumentBody for MinutesContent {
    const KIND: DocumentKind = DocumentKind::Minutes;
}

/// One immutable recorded state of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<B> {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub body: B,
}

impl<B: DocumentBody> Snapshot<B> {
    /// Stamp a body with a fresh id and the current time.
    pub fn new(body: B) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now_timestamp(),
            body,
        }
    }

    /// Rebuild a snapshot from its stored row.
    pub fn from_record(record: &SnapshotRecord) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: record.id.clone(),
            created_at: record.created_at.clone(),
            body: serde_json::from_str(&record.body)?,
        })
    }

    /// JSON encoding of the body alone, as stored in the snapshot table.
    pub fn body_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.body)
    }

    /// The row to write for this snapshot.
    pub fn to_row(&self) -> Result<NewSnapshot, serde_json::Error> {
        Ok(NewSnapshot {
            id: self.id.clone(),
            body: self.body_json()?,
            created_at: self.created_at.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agenda_body_uses_camel_case_and_defaults() {
        let json = r#"{"objectives":"Kickoff","actionItems":[{"task":"Book room","assignee":"Ana"}]}"#;
        let body: AgendaContent = serde_json::from_str(json).unwrap();
        assert_eq!(body.objectives, "Kickoff");
        assert!(body.items.is_empty());
        assert!(body.preparation.is_empty());
        assert_eq!(body.action_items[0].assignee, "Ana");
        assert_eq!(body.action_items[0].due_date, None);
    }

    #[test]
    fn snapshot_flattens_body_fields() {
        let snapshot = Snapshot {
            id: "s1".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            body: MinutesContent {
                discussion: "Budget".to_string(),
                ..MinutesContent::default()
            },
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["id"], "s1");
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00.000Z");
        assert_eq!(value["discussion"], "Budget");
        assert!(value["nextMeeting"].is_null());
    }

    #[test]
    fn from_record_restores_identity_and_body() {
        let record = SnapshotRecord {
            seq: 7,
            id: "snap-7".to_string(),
            meeting_id: "m1".to_string(),
            kind: DocumentKind::Agenda,
            body: r#"{"objectives":"Plan"}"#.to_string(),
            created_at: "2026-02-01T10:00:00.000Z".to_string(),
            removed_at: None,
        };
        let snapshot = Snapshot::<AgendaContent>::from_record(&record).unwrap();
        assert_eq!(snapshot.id, "snap-7");
        assert_eq!(snapshot.body.objectives, "Plan");
    }

    #[test]
    fn new_snapshots_get_distinct_ids() {
        let a = Snapshot::new(AgendaContent::default());
        let b = Snapshot::new(AgendaContent::default());
        assert_ne!(a.id, b.id);
    }
}
