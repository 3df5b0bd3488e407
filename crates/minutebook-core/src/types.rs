// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Minutebook crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Rasterizer,
    Delivery,
}

/// How a meeting is held.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum MeetingMode {
    #[serde(rename = "in-person")]
    #[strum(serialize = "in-person")]
    InPerson,
    #[serde(rename = "remote")]
    #[strum(serialize = "remote")]
    Remote,
}

/// The two versioned documents attached to every meeting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    Agenda,
    Minutes,
}

/// The root entity: a scheduled meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub mode: MeetingMode,
    pub join_link: Option<String>,
    pub owner: String,
    pub created_at: String,
}

/// Fields supplied by a caller creating a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub mode: MeetingMode,
    #[serde(default)]
    pub join_link: Option<String>,
    pub owner: String,
}

impl NewMeeting {
    /// Assign an id and creation timestamp.
    pub fn into_meeting(self) -> Meeting {
        Meeting {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            scheduled_at: self.scheduled_at,
            mode: self.mode,
            join_link: self.join_link,
            owner: self.owner,
            created_at: now_timestamp(),
        }
    }
}

/// A persisted snapshot row, with the document body still encoded as JSON.
///
/// `seq` is the storage-assigned append position and the only ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub seq: i64,
    pub id: String,
    pub meeting_id: String,
    pub kind: DocumentKind,
    pub body: String,
    pub created_at: String,
    pub removed_at: Option<String>,
}

/// A snapshot row about to be written: id, creation time and encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnapshot {
    pub id: String,
    pub body: String,
    pub created_at: String,
}

/// Audit record of one report-generation event.
///
/// Anchors a version number and a generation time, not the rendered bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub meeting_id: String,
    pub version: u32,
    pub generated_at: String,
    #[serde(default)]
    pub delivered_to: Vec<String>,
}

impl Report {
    /// A fresh, undelivered report row for the given version.
    pub fn new(meeting_id: &str, version: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            meeting_id: meeting_id.to_string(),
            version,
            generated_at: now_timestamp(),
            delivered_to: Vec::new(),
        }
    }
}

/// Current UTC time in the millisecond ISO 8601 form used for every stored timestamp.
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// A rendered, rasterized report ready to be saved or delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// File extension without the dot.
    pub extension: String,
}

/// Everything a delivery gateway needs to ship one artifact.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub subject: String,
    pub body_html: String,
    pub artifact: Artifact,
    pub filename: String,
    pub recipients: Vec<String>,
}
