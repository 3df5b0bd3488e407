// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Minutebook.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a
//! single-writer connection via `tokio-rusqlite`, plus the two services built
//! on it: the typed [`DocumentStore`] for agenda and minutes histories and the
//! [`ReportSequencer`] that hands out per-meeting report versions.

pub mod adapter;
pub mod database;
pub mod documents;
pub mod migrations;
pub mod queries;
pub mod sequencer;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use documents::{DocumentStore, HistoryEntry};
pub use queries::legacy::LegacyImport;
pub use sequencer::ReportSequencer;
