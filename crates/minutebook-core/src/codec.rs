// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot history codec.
//!
//! A history is encoded as a versioned JSON envelope:
//!
//! ```json
//! {"format":1,"snapshots":[{"id":"...","createdAt":"...", ...body fields}]}
//! ```
//!
//! Decoding also accepts the bare JSON array written before the envelope
//! existed. The same text columns once held free-form notes, so anything that
//! does not parse decodes to an empty history instead of an error. Use
//! [`inspect`] when the difference between "nothing recorded" and "unreadable"
//! matters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::{DocumentBody, Snapshot};

/// Envelope format written by [`encode`].
pub const FORMAT_VERSION: u64 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, B> {
    format: u64,
    snapshots: &'a [Snapshot<B>],
}

#[derive(Deserialize)]
struct Envelope<B> {
    format: u64,
    snapshots: Vec<Snapshot<B>>,
}

/// What a stored history payload turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadState {
    /// Empty or whitespace-only text.
    Blank,
    /// A readable history with this many snapshots (possibly zero).
    Snapshots(usize),
    /// Text that is not a snapshot history, such as legacy free-form notes.
    Unrecognized,
}

/// Encode a history, preserving order and every field.
pub fn encode<B: DocumentBody>(history: &[Snapshot<B>]) -> String {
    let envelope = EnvelopeRef {
        format: FORMAT_VERSION,
        snapshots: history,
    };
    // Snapshot bodies are plain structs of strings, numbers and lists.
    serde_json::to_string(&envelope).unwrap_or_else(|_| {
        format!(r#"{{"format":{FORMAT_VERSION},"snapshots":[]}}"#)
    })
}

/// Decode a stored payload, returning an empty history for anything unreadable.
pub fn decode<B: DocumentBody>(text: &str) -> Vec<Snapshot<B>> {
    match try_decode(text) {
        Some(history) => history,
        None => {
            debug!(
                kind = %B::KIND,
                len = text.len(),
                "history payload unreadable, treating as empty"
            );
            Vec::new()
        }
    }
}

/// The most recently appended snapshot, if any.
pub fn latest<B>(history: &[Snapshot<B>]) -> Option<&Snapshot<B>> {
    history.last()
}

/// Classify a stored payload without decoding bodies into a specific kind.
pub fn inspect<B: DocumentBody>(text: &str) -> PayloadState {
    if text.trim().is_empty() {
        return PayloadState::Blank;
    }
    match try_decode::<B>(text) {
        Some(history) => PayloadState::Snapshots(history.len()),
        None => PayloadState::Unrecognized,
    }
}

fn try_decode<B: DocumentBody>(text: &str) -> Option<Vec<Snapshot<B>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(trimmed).ok()?;
    match value {
        Value::Array(_) => serde_json::from_value(value).ok(),
        Value::Object(_) => {
            let envelope: Envelope<B> = serde_json::from_value(value).ok()?;
            (envelope.format == FORMAT_VERSION).then_some(envelope.snapshots)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ActionItem, AgendaContent, AgendaItem, MinutesContent};
    use proptest::prelude::*;

    fn agenda_snapshot(id: &str, created_at: &str, objectives: &str) -> Snapshot<AgendaContent> {
        Snapshot {
            id: id.to_string(),
            created_at: created_at.to_string(),
            body: AgendaContent {
                objectives: objectives.to_string(),
                ..AgendaContent::default()
            },
        }
    }

    #[test]
    fn empty_history_round_trips() {
        let encoded = encode::<AgendaContent>(&[]);
        assert_eq!(encoded, r#"{"format":1,"snapshots":[]}"#);
        assert!(decode::<AgendaContent>(&encoded).is_empty());
        assert_eq!(inspect::<AgendaContent>(&encoded), PayloadState::Snapshots(0));
    }

    #[test]
    fn full_minutes_history_round_trips() {
        let history = vec![
            Snapshot {
                id: "m-1".to_string(),
                created_at: "2026-03-01T09:00:00.000Z".to_string(),
                body: MinutesContent::default(),
            },
            Snapshot {
                id: "m-2".to_string(),
                created_at: "2026-03-01T10:00:00.000Z".to_string(),
                body: MinutesContent {
                    attendees: vec!["Ana".to_string(), "Raj".to_string()],
                    discussion: "Quarterly numbers".to_string(),
                    decisions: vec!["Ship in May".to_string()],
                    action_items: vec![ActionItem {
                        task: "Draft memo".to_string(),
                        assignee: "Raj".to_string(),
                        due_date: Some("2026-03-08".to_string()),
                    }],
                    next_meeting: Some("2026-03-15T09:00:00Z".to_string()),
                },
            },
        ];
        assert_eq!(decode::<MinutesContent>(&encode(&history)), history);
    }

    #[test]
    fn bare_array_from_before_the_envelope_decodes() {
        let text = r#"[{"id":"a1","createdAt":"2026-01-01T00:00:00.000Z","objectives":"Kickoff"}]"#;
        let history = decode::<AgendaContent>(text);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].body.objectives, "Kickoff");
    }

    #[test]
    fn legacy_free_text_decodes_to_empty() {
        let text = "Discuss budget, then hiring. Bring laptops.";
        assert!(decode::<AgendaContent>(text).is_empty());
        assert_eq!(inspect::<AgendaContent>(text), PayloadState::Unrecognized);
    }

    #[test]
    #[tracing_test::traced_test]
    fn unreadable_payload_is_logged_not_raised() {
        assert!(decode::<AgendaContent>("Agenda: TBD").is_empty());
        assert!(logs_contain("history payload unreadable"));
    }

    #[test]
    fn garbage_never_panics() {
        for text in ["", "   ", "{", "null", "42", "\"quoted\"", "[1,2,3]", r#"{"format":9,"snapshots":[]}"#] {
            assert!(decode::<MinutesContent>(text).is_empty(), "input: {text}");
        }
        assert_eq!(inspect::<MinutesContent>("  \n"), PayloadState::Blank);
    }

    #[test]
    fn latest_is_last_appended_not_newest_timestamp() {
        let history = vec![
            agenda_snapshot("a1", "2030-01-01T00:00:00.000Z", "Kickoff"),
            agenda_snapshot("a2", "2001-01-01T00:00:00.000Z", "Kickoff v2"),
        ];
        assert_eq!(latest(&history).map(|s| s.id.as_str()), Some("a2"));
        assert!(latest::<AgendaContent>(&[]).is_none());
    }

    fn agenda_item() -> impl Strategy<Value = AgendaItem> {
        (".{0,12}", ".{0,12}", ".{0,8}", 0u32..240).prop_map(
            |(topic, description, presenter, duration_minutes)| AgendaItem {
                topic,
                description,
                presenter,
                duration_minutes,
            },
        )
    }

    fn action_item() -> impl Strategy<Value = ActionItem> {
        (".{0,12}", ".{0,8}", proptest::option::of("[0-9]{4}-[0-9]{2}-[0-9]{2}")).prop_map(
            |(task, assignee, due_date)| ActionItem {
                task,
                assignee,
                due_date,
            },
        )
    }

    fn agenda_history() -> impl Strategy<Value = Vec<Snapshot<AgendaContent>>> {
        let body = (
            ".{0,20}",
            proptest::collection::vec(".{0,10}", 0..3),
            proptest::collection::vec(agenda_item(), 0..3),
            proptest::collection::vec(action_item(), 0..3),
        )
            .prop_map(|(objectives, preparation, items, action_items)| AgendaContent {
                objectives,
                preparation,
                items,
                action_items,
            });
        proptest::collection::vec(("[a-f0-9]{8}", body), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(id, body)| Snapshot {
                    id,
                    created_at: "2026-01-01T00:00:00.000Z".to_string(),
                    body,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(history in agenda_history()) {
            prop_assert_eq!(decode::<AgendaContent>(&encode(&history)), history);
        }

        #[test]
        fn decode_of_arbitrary_text_does_not_panic(text in ".{0,64}") {
            let _ = decode::<MinutesContent>(&text);
        }
    }
}
