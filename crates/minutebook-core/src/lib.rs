// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Minutebook.
//!
//! This crate provides the domain types (meetings, snapshots, reports), the
//! snapshot history codec, the shared error type, and the adapter traits
//! implemented by the storage, rasterizer and delivery crates.

pub mod codec;
pub mod document;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use document::{
    ActionItem, AgendaContent, AgendaItem, DocumentBody, MinutesContent, Snapshot,
};
pub use error::MinutebookError;
pub use types::{
    AdapterType, Artifact, DeliveryRequest, DocumentKind, HealthStatus, Meeting, MeetingMode,
    NewMeeting, NewSnapshot, Report, SnapshotRecord,
};

pub use traits::{DeliveryAdapter, PluginAdapter, RasterizerAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        for variant in [
            AdapterType::Storage,
            AdapterType::Rasterizer,
            AdapterType::Delivery,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn meeting_mode_uses_hyphenated_names() {
        assert_eq!(MeetingMode::InPerson.to_string(), "in-person");
        assert_eq!(MeetingMode::from_str("remote").unwrap(), MeetingMode::Remote);
        let json = serde_json::to_string(&MeetingMode::InPerson).unwrap();
        assert_eq!(json, "\"in-person\"");
    }

    #[test]
    fn document_kind_is_snake_case() {
        assert_eq!(DocumentKind::Agenda.to_string(), "agenda");
        assert_eq!(DocumentKind::from_str("minutes").unwrap(), DocumentKind::Minutes);
        assert_eq!(AgendaContent::KIND, DocumentKind::Agenda);
        assert_eq!(MinutesContent::KIND, DocumentKind::Minutes);
    }

    #[test]
    fn only_version_conflicts_are_retryable() {
        let conflict = MinutebookError::VersionConflict {
            meeting_id: "m1".into(),
            version: 3,
        };
        assert!(conflict.is_retryable());
        assert!(!MinutebookError::Internal("x".into()).is_retryable());
        let raster = MinutebookError::Rasterization {
            message: "boom".into(),
            source: None,
        };
        assert!(!raster.is_retryable());
    }

    #[test]
    fn new_report_starts_undelivered() {
        let report = Report::new("m1", 4);
        assert_eq!(report.meeting_id, "m1");
        assert_eq!(report.version, 4);
        assert!(report.delivered_to.is_empty());
        assert!(report.generated_at.ends_with('Z'));
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_rasterizer_adapter<T: RasterizerAdapter>() {}
        fn _assert_delivery_adapter<T: DeliveryAdapter>() {}
    }
}
