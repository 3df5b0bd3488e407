// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Minutebook crate.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// Decoding a snapshot history never produces an error: malformed payloads
/// read as an empty history. Missing snapshots are not errors either.
#[derive(Debug, Error)]
pub enum MinutebookError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The referenced meeting does not exist.
    #[error("meeting not found: {meeting_id}")]
    MeetingNotFound { meeting_id: String },

    /// The referenced report does not exist.
    #[error("report not found: {report_id}")]
    ReportNotFound { report_id: String },

    /// Another report claimed the same version number for this meeting.
    ///
    /// Retryable: a fresh attempt reads a new maximum version.
    #[error("report version {version} already taken for meeting {meeting_id}")]
    VersionConflict { meeting_id: String, version: u32 },

    /// The rasterizer failed to turn the composed document into an artifact.
    #[error("report generation failed: {message}")]
    Rasterization {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The delivery gateway failed to transmit an artifact.
    #[error("delivery failed: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller supplied input that cannot be processed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MinutebookError {
    /// Whether repeating the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Wrap any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
