// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutebook agenda` and `minutebook minutes` commands.
//!
//! Both documents share one command set; the body type decides which history
//! is touched.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use minutebook_core::{DocumentBody, MinutebookError, StorageAdapter};
use minutebook_storage::DocumentStore;

use crate::app::App;
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum DocumentCommand {
    /// Record a new snapshot. The body is JSON from --json, --file or stdin.
    Append {
        meeting_id: String,
        #[arg(long, conflicts_with = "json")]
        file: Option<PathBuf>,
        #[arg(long)]
        json: Option<String>,
    },
    /// Print the current snapshot as JSON.
    Latest { meeting_id: String },
    /// List snapshots in the order they were recorded.
    History {
        meeting_id: String,
        /// Include removed snapshots.
        #[arg(long)]
        all: bool,
    },
    /// Remove a snapshot from the visible history.
    Remove {
        meeting_id: String,
        snapshot_id: String,
    },
    /// Write the history in its portable encoded form.
    Export {
        meeting_id: String,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add snapshots from an exported history.
    Import { meeting_id: String, file: PathBuf },
}

pub async fn run<B: DocumentBody>(
    app: &App,
    out: &Output,
    command: DocumentCommand,
) -> Result<(), MinutebookError> {
    let storage = app.storage();
    let store = DocumentStore::<B>::new(storage.clone());
    let kind = B::KIND;
    match command {
        DocumentCommand::Append {
            meeting_id,
            file,
            json,
        } => {
            let text = read_input(file.as_deref(), json)?;
            let body = parse_body::<B>(&text)?;
            let snapshot = store.append(&meeting_id, body).await?;
            out.success(&format!("recorded {kind} snapshot {}", snapshot.id));
        }
        DocumentCommand::Latest { meeting_id } => {
            require_meeting(storage.as_ref(), &meeting_id).await?;
            match store.latest_of(&meeting_id).await? {
                Some(snapshot) => {
                    let json = serde_json::to_string_pretty(&snapshot)
                        .map_err(|e| MinutebookError::Internal(e.to_string()))?;
                    println!("{json}");
                }
                None => out.warn(&format!("no {kind} recorded for meeting {meeting_id}")),
            }
        }
        DocumentCommand::History { meeting_id, all } => {
            require_meeting(storage.as_ref(), &meeting_id).await?;
            let entries = store.all_including_removed(&meeting_id).await?;
            let mut shown = 0;
            for entry in entries {
                match &entry.removed_at {
                    Some(removed_at) if all => println!(
                        "{}  {}  {}",
                        out.dim(&entry.snapshot.created_at),
                        entry.snapshot.id,
                        out.dim(&format!("(removed {removed_at})"))
                    ),
                    Some(_) => continue,
                    None => println!(
                        "{}  {}",
                        out.dim(&entry.snapshot.created_at),
                        entry.snapshot.id
                    ),
                }
                shown += 1;
            }
            if shown == 0 {
                println!("no {kind} snapshots");
            }
        }
        DocumentCommand::Remove {
            meeting_id,
            snapshot_id,
        } => {
            if store.remove(&meeting_id, &snapshot_id).await? {
                out.success(&format!("removed {kind} snapshot {snapshot_id}"));
            } else {
                out.warn(&format!("no visible {kind} snapshot {snapshot_id}"));
            }
        }
        DocumentCommand::Export { meeting_id, output } => {
            let encoded = store.export(&meeting_id).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, encoded).map_err(|e| {
                        MinutebookError::Internal(format!("cannot write {}: {e}", path.display()))
                    })?;
                    out.success(&format!("exported {kind} history to {}", path.display()));
                }
                None => println!("{encoded}"),
            }
        }
        DocumentCommand::Import { meeting_id, file } => {
            let text = read_input(Some(&file), None)?;
            let imported = store.import(&meeting_id, &text).await?;
            out.success(&format!("imported {imported} {kind} snapshot(s)"));
        }
    }
    Ok(())
}

async fn require_meeting(
    storage: &(dyn StorageAdapter + Send + Sync),
    meeting_id: &str,
) -> Result<(), MinutebookError> {
    match storage.get_meeting(meeting_id).await? {
        Some(_) => Ok(()),
        None => Err(MinutebookError::MeetingNotFound {
            meeting_id: meeting_id.to_string(),
        }),
    }
}

fn read_input(file: Option<&Path>, inline: Option<String>) -> Result<String, MinutebookError> {
    if let Some(text) = inline {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| {
            MinutebookError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        });
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| MinutebookError::InvalidInput(format!("cannot read stdin: {e}")))?;
    Ok(text)
}

fn parse_body<B: DocumentBody>(text: &str) -> Result<B, MinutebookError> {
    serde_json::from_str(text)
        .map_err(|e| MinutebookError::InvalidInput(format!("{} body is not valid: {e}", B::KIND)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minutebook_core::{AgendaContent, MinutesContent};

    #[test]
    fn bodies_parse_from_camel_case_json() {
        let agenda: AgendaContent = parse_body(
            r#"{"objectives":"Plan Q2","items":[{"topic":"Budget","durationMinutes":15}]}"#,
        )
        .unwrap();
        assert_eq!(agenda.objectives, "Plan Q2");
        assert_eq!(agenda.items[0].duration_minutes, 15);

        let minutes: MinutesContent =
            parse_body(r#"{"decisions":["Ship it"],"nextMeeting":"2026-05-05"}"#).unwrap();
        assert_eq!(minutes.next_meeting.as_deref(), Some("2026-05-05"));
    }

    #[test]
    fn malformed_body_is_invalid_input() {
        let err = parse_body::<AgendaContent>("{not json").unwrap_err();
        assert!(matches!(err, MinutebookError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn reads_require_an_existing_meeting() {
        let harness = minutebook_test_utils::TestHarness::builder()
            .build()
            .await
            .unwrap();
        let meeting = harness.create_meeting("Weekly sync").await.unwrap();

        require_meeting(harness.storage.as_ref(), &meeting.id)
            .await
            .unwrap();
        let err = require_meeting(harness.storage.as_ref(), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, MinutebookError::MeetingNotFound { .. }));
    }

    #[test]
    fn inline_input_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(read_input(Some(&path), None).unwrap(), "{}");
        assert_eq!(
            read_input(Some(&path), Some("[]".to_string())).unwrap(),
            "[]"
        );
        assert!(read_input(Some(&dir.path().join("missing.json")), None).is_err());
    }
}
