// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutebook meeting` commands.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Subcommand;
use minutebook_core::{
    AgendaContent, Meeting, MeetingMode, MinutebookError, MinutesContent, NewMeeting,
};
use minutebook_storage::DocumentStore;

use crate::app::App;
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// Schedule a new meeting.
    Create {
        title: String,
        /// Start time, RFC 3339 or `YYYY-MM-DD HH:MM` in UTC.
        #[arg(long)]
        at: String,
        /// `in-person` or `remote`.
        #[arg(long, default_value = "remote")]
        mode: String,
        /// Video call link for remote meetings.
        #[arg(long)]
        link: Option<String>,
        /// Organizer, usually an email address.
        #[arg(long)]
        owner: String,
    },
    /// List meetings by start time.
    List,
    /// Show a meeting with its document and report counts.
    Show { id: String },
    /// Delete a meeting with its histories and reports.
    Delete { id: String },
}

pub async fn run(app: &App, out: &Output, command: MeetingCommand) -> Result<(), MinutebookError> {
    let storage = app.storage();
    match command {
        MeetingCommand::Create {
            title,
            at,
            mode,
            link,
            owner,
        } => {
            let meeting = new_meeting(&title, &at, &mode, link, &owner)?.into_meeting();
            storage.create_meeting(&meeting).await?;
            out.success(&format!("created meeting {}", meeting.id));
        }
        MeetingCommand::List => {
            let meetings = storage.list_meetings().await?;
            if meetings.is_empty() {
                println!("no meetings");
            }
            for meeting in meetings {
                println!(
                    "{}  {}  {}",
                    out.dim(&meeting.scheduled_at.format("%Y-%m-%d %H:%M").to_string()),
                    meeting.id,
                    out.heading(&meeting.title)
                );
            }
        }
        MeetingCommand::Show { id } => {
            let meeting = storage
                .get_meeting(&id)
                .await?
                .ok_or_else(|| MinutebookError::MeetingNotFound {
                    meeting_id: id.clone(),
                })?;
            let agendas = DocumentStore::<AgendaContent>::new(storage.clone())
                .all_of(&id)
                .await?
                .len();
            let minutes = DocumentStore::<MinutesContent>::new(storage.clone())
                .all_of(&id)
                .await?
                .len();
            let reports = storage.list_reports(&id).await?.len();
            print_meeting(out, &meeting);
            println!("  agenda snapshots:  {agendas}");
            println!("  minutes snapshots: {minutes}");
            println!("  reports:           {reports}");
        }
        MeetingCommand::Delete { id } => {
            if storage.delete_meeting(&id).await? {
                out.success(&format!("deleted meeting {id}"));
            } else {
                return Err(MinutebookError::MeetingNotFound { meeting_id: id });
            }
        }
    }
    Ok(())
}

fn print_meeting(out: &Output, meeting: &Meeting) {
    println!("{}", out.heading(&meeting.title));
    println!("  id:        {}", meeting.id);
    println!(
        "  scheduled: {}",
        meeting.scheduled_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("  mode:      {}", meeting.mode);
    if let Some(link) = &meeting.join_link {
        println!("  link:      {link}");
    }
    println!("  owner:     {}", meeting.owner);
}

fn new_meeting(
    title: &str,
    at: &str,
    mode: &str,
    link: Option<String>,
    owner: &str,
) -> Result<NewMeeting, MinutebookError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MinutebookError::InvalidInput("meeting title is empty".to_string()));
    }
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(MinutebookError::InvalidInput("meeting owner is empty".to_string()));
    }
    let mode = MeetingMode::from_str(mode.trim()).map_err(|_| {
        MinutebookError::InvalidInput(format!(
            "unknown meeting mode `{mode}`, expected `in-person` or `remote`"
        ))
    })?;
    Ok(NewMeeting {
        title: title.to_string(),
        scheduled_at: parse_when(at)?,
        mode,
        join_link: link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        owner: owner.to_string(),
    })
}

fn parse_when(text: &str) -> Result<DateTime<Utc>, MinutebookError> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            MinutebookError::InvalidInput(format!(
                "cannot read `{text}` as a time, use RFC 3339 or `YYYY-MM-DD HH:MM`"
            ))
        })
}
