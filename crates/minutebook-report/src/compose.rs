// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-shape report composition.
//!
//! A report always has the same eight sections in the same order. A section
//! with nothing to show renders [`NO_DATA`] rather than disappearing, so an
//! empty meeting still yields a complete document. Composition is a pure
//! function of its inputs; only the footer carries the generation time.

use chrono::{DateTime, NaiveDate, Utc};
use comrak::{markdown_to_html, Options};
use minutebook_config::model::ReportConfig;
use minutebook_core::{
    ActionItem, AgendaContent, Meeting, MeetingMode, MinutesContent, Snapshot,
};

/// Text shown in place of a section that has no content.
pub const NO_DATA: &str = "No data available.";

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:2.5em;color:#222;line-height:1.45}\
h1{font-size:1.6em;margin-bottom:0.2em}\
h2{font-size:1.2em;border-bottom:1px solid #ccc;padding-bottom:0.2em;margin-top:1.6em}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:0.35em 0.6em;text-align:left;vertical-align:top}\
th{background:#f3f3f3}\
hr{margin-top:2em;border:none;border-top:1px solid #ccc}";

/// The sections of a report, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    MeetingDetails,
    ExecutiveSummary,
    Objectives,
    KeyDiscussionPoints,
    Decisions,
    ActionItems,
    Risks,
    Conclusion,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::MeetingDetails,
        SectionKind::ExecutiveSummary,
        SectionKind::Objectives,
        SectionKind::KeyDiscussionPoints,
        SectionKind::Decisions,
        SectionKind::ActionItems,
        SectionKind::Risks,
        SectionKind::Conclusion,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::MeetingDetails => "Meeting Details",
            SectionKind::ExecutiveSummary => "Executive Summary",
            SectionKind::Objectives => "Objectives",
            SectionKind::KeyDiscussionPoints => "Key Discussion Points",
            SectionKind::Decisions => "Decisions",
            SectionKind::ActionItems => "Action Items",
            SectionKind::Risks => "Risks",
            SectionKind::Conclusion => "Conclusion",
        }
    }
}

/// What a section contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Placeholder,
    Paragraphs(Vec<String>),
    Bullets(Vec<String>),
    Fields(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub body: SectionBody,
}

impl Section {
    pub fn is_placeholder(&self) -> bool {
        self.body == SectionBody::Placeholder
    }
}

/// Organization-level text stamped into every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub organization: String,
    pub closing_text: String,
}

impl Branding {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            organization: config.organization.clone(),
            closing_text: config.closing_text.clone(),
        }
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

/// A composed report, ready to be written out as Markdown or HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    pub organization: String,
    pub version: u32,
    pub sections: Vec<Section>,
    pub generated_at: String,
}

/// Compose the report for a meeting from its latest agenda and minutes.
///
/// Either snapshot may be absent; the affected sections fall back to
/// placeholders.
pub fn compose(
    meeting: &Meeting,
    agenda: Option<&Snapshot<AgendaContent>>,
    minutes: Option<&Snapshot<MinutesContent>>,
    version: u32,
    generated_at: &str,
    branding: &Branding,
) -> ReportDocument {
    let agenda = agenda.map(|s| &s.body);
    let minutes = minutes.map(|s| &s.body);

    let sections = SectionKind::ALL
        .iter()
        .map(|&kind| {
            let body = match kind {
                SectionKind::MeetingDetails => meeting_details(meeting, minutes),
                SectionKind::ExecutiveSummary => {
                    paragraphs_or_placeholder(minutes.map_or("", |m| m.discussion.as_str()))
                }
                SectionKind::Objectives => {
                    paragraphs_or_placeholder(agenda.map_or("", |a| a.objectives.as_str()))
                }
                SectionKind::KeyDiscussionPoints => discussion_points(agenda),
                SectionKind::Decisions => {
                    bullets_or_placeholder(minutes.map_or(&[][..], |m| &m.decisions[..]))
                }
                SectionKind::ActionItems => action_items(agenda, minutes),
                SectionKind::Risks => {
                    bullets_or_placeholder(agenda.map_or(&[][..], |a| &a.preparation[..]))
                }
                SectionKind::Conclusion => conclusion(agenda, minutes, branding),
            };
            Section { kind, body }
        })
        .collect();

    ReportDocument {
        title: meeting.title.clone(),
        organization: branding.organization.clone(),
        version,
        sections,
        generated_at: generated_at.to_string(),
    }
}

fn meeting_details(meeting: &Meeting, minutes: Option<&MinutesContent>) -> SectionBody {
    let mut fields = vec![
        ("Title".to_string(), meeting.title.clone()),
        ("Scheduled".to_string(), format_when(&meeting.scheduled_at)),
        (
            "Mode".to_string(),
            match meeting.mode {
                MeetingMode::InPerson => "In person".to_string(),
                MeetingMode::Remote => "Remote".to_string(),
            },
        ),
    ];
    if let Some(link) = meeting.join_link.as_deref().map(str::trim)
        && !link.is_empty()
    {
        fields.push(("Join link".to_string(), link.to_string()));
    }
    fields.push(("Organizer".to_string(), meeting.owner.clone()));

    let attendees = minutes.map(|m| non_blank(&m.attendees)).unwrap_or_default();
    if !attendees.is_empty() {
        fields.push(("Attendees".to_string(), attendees.join(", ")));
    }
    SectionBody::Fields(fields)
}

fn discussion_points(agenda: Option<&AgendaContent>) -> SectionBody {
    let rows: Vec<Vec<String>> = agenda
        .map(|a| a.items.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|item| !item.topic.trim().is_empty() || !item.description.trim().is_empty())
        .map(|item| {
            vec![
                item.topic.trim().to_string(),
                item.description.trim().to_string(),
                item.presenter.trim().to_string(),
                if item.duration_minutes == 0 {
                    String::new()
                } else {
                    format!("{} min", item.duration_minutes)
                },
            ]
        })
        .collect();
    table_or_placeholder(&["Topic", "Description", "Presenter", "Duration"], rows)
}

fn action_items(agenda: Option<&AgendaContent>, minutes: Option<&MinutesContent>) -> SectionBody {
    let from_minutes = minutes.map(|m| live_actions(&m.action_items)).unwrap_or_default();
    let chosen = if from_minutes.is_empty() {
        agenda.map(|a| live_actions(&a.action_items)).unwrap_or_default()
    } else {
        from_minutes
    };
    let rows = chosen
        .into_iter()
        .map(|item| {
            vec![
                item.task.trim().to_string(),
                item.assignee.trim().to_string(),
                item.due_date
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(format_day)
                    .unwrap_or_else(|| "Not set".to_string()),
            ]
        })
        .collect();
    table_or_placeholder(&["Task", "Assignee", "Due"], rows)
}

fn conclusion(
    agenda: Option<&AgendaContent>,
    minutes: Option<&MinutesContent>,
    branding: &Branding,
) -> SectionBody {
    if agenda.is_none() && minutes.is_none() {
        return SectionBody::Placeholder;
    }
    let mut paragraphs = split_paragraphs(&branding.closing_text);
    if let Some(next) = minutes
        .and_then(|m| m.next_meeting.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        paragraphs.push(format!("Next meeting: {}", format_day(next)));
    }
    if paragraphs.is_empty() {
        SectionBody::Placeholder
    } else {
        SectionBody::Paragraphs(paragraphs)
    }
}

fn live_actions(items: &[ActionItem]) -> Vec<&ActionItem> {
    items.iter().filter(|i| !i.task.trim().is_empty()).collect()
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}

fn paragraphs_or_placeholder(text: &str) -> SectionBody {
    let paragraphs = split_paragraphs(text);
    if paragraphs.is_empty() {
        SectionBody::Placeholder
    } else {
        SectionBody::Paragraphs(paragraphs)
    }
}

fn bullets_or_placeholder(items: &[String]) -> SectionBody {
    let items = non_blank(items);
    if items.is_empty() {
        SectionBody::Placeholder
    } else {
        SectionBody::Bullets(items)
    }
}

fn table_or_placeholder(headers: &[&str], rows: Vec<Vec<String>>) -> SectionBody {
    if rows.is_empty() {
        SectionBody::Placeholder
    } else {
        SectionBody::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

fn format_when(at: &DateTime<Utc>) -> String {
    at.format("%A, %-d %B %Y, %H:%M UTC").to_string()
}

/// Human form of a stored date or timestamp; unparseable text is shown as-is.
fn format_day(text: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return format_when(&at.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return day.format("%A, %-d %B %Y").to_string();
    }
    text.to_string()
}

impl ReportDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Markdown for everything except the footer. Identical inputs always
    /// give identical output.
    pub fn body_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Meeting Report: {}\n\n", escape_inline(&self.title)));
        out.push_str(&format!(
            "_{}, report version {}_\n",
            escape_inline(&self.organization),
            self.version
        ));

        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n", section.kind.title()));
            match &section.body {
                SectionBody::Placeholder => {
                    out.push_str(NO_DATA);
                    out.push('\n');
                }
                SectionBody::Paragraphs(paragraphs) => {
                    let rendered: Vec<String> =
                        paragraphs.iter().map(|p| escape_inline(p)).collect();
                    out.push_str(&rendered.join("\n\n"));
                    out.push('\n');
                }
                SectionBody::Bullets(items) => {
                    for item in items {
                        out.push_str(&format!("- {}\n", escape_inline(item)));
                    }
                }
                SectionBody::Fields(fields) => {
                    for (label, value) in fields {
                        out.push_str(&format!("- **{label}:** {}\n", escape_inline(value)));
                    }
                }
                SectionBody::Table { headers, rows } => {
                    out.push_str(&format!("| {} |\n", headers.join(" | ")));
                    out.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
                    for row in rows {
                        let cells: Vec<String> = row.iter().map(|c| escape_inline(c)).collect();
                        out.push_str(&format!("| {} |\n", cells.join(" | ")));
                    }
                }
            }
        }
        out
    }

    /// The complete Markdown document, footer included.
    pub fn to_markdown(&self) -> String {
        format!(
            "{}\n---\n\nGenerated at {} by {}\n",
            self.body_markdown(),
            escape_inline(&self.generated_at),
            escape_inline(&self.organization)
        )
    }

    /// A standalone HTML page. Text from documents is escaped, never
    /// interpreted as markup.
    pub fn to_html(&self) -> String {
        let mut options = Options::default();
        options.extension.table = true;
        let body = markdown_to_html(&self.to_markdown(), &options);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Meeting Report: {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
            escape_html(&self.title)
        )
    }
}

/// Make arbitrary text safe to drop into a Markdown line or table cell.
fn escape_inline(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(flat.len());
    for c in flat.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' | '~' | '&' | '!'
        ) {
            out.push('\\');
        }
        out.push(c);
    }

    // Keep a leading "-", "+", "=" or "1." from turning the line into a list
    // or heading.
    if out.starts_with(['-', '+', '=']) {
        out.insert(0, '\\');
    } else {
        let digits = out.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && out[digits..].starts_with(['.', ')']) {
            out.insert(digits, '\\');
        }
    }
    out
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use minutebook_core::{AgendaItem, NewMeeting};

    fn meeting() -> Meeting {
        let mut meeting = NewMeeting {
            title: "Q2 Planning".to_string(),
            scheduled_at: Utc.with_ymd_and_hms(2026, 4, 7, 14, 0, 0).unwrap(),
            mode: MeetingMode::Remote,
            join_link: Some("https://meet.example.com/q2".to_string()),
            owner: "ana@example.com".to_string(),
        }
        .into_meeting();
        meeting.id = "m-1".to_string();
        meeting.created_at = "2026-04-01T09:00:00.000Z".to_string();
        meeting
    }

    fn snapshot<B>(body: B) -> Snapshot<B> {
        Snapshot {
            id: "s-1".to_string(),
            created_at: "2026-04-01T10:00:00.000Z".to_string(),
            body,
        }
    }

    fn full_agenda() -> Snapshot<AgendaContent> {
        snapshot(AgendaContent {
            objectives: "Agree the Q2 roadmap.".to_string(),
            preparation: vec!["Vendor contract expires in May".to_string()],
            items: vec![AgendaItem {
                topic: "Roadmap".to_string(),
                description: "Walk through the draft".to_string(),
                presenter: "Raj".to_string(),
                duration_minutes: 20,
            }],
            action_items: vec![ActionItem {
                task: "Circulate draft".to_string(),
                assignee: "Raj".to_string(),
                due_date: Some("2026-04-05".to_string()),
            }],
        })
    }

    fn compose_at(
        agenda: Option<&Snapshot<AgendaContent>>,
        minutes: Option<&Snapshot<MinutesContent>>,
        generated_at: &str,
    ) -> ReportDocument {
        compose(&meeting(), agenda, minutes, 1, generated_at, &Branding::default())
    }

    #[test]
    fn sections_follow_fixed_order() {
        let doc = compose_at(None, None, "2026-04-07T15:00:00.000Z");
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn no_snapshots_means_every_content_section_is_a_placeholder() {
        let doc = compose_at(None, None, "2026-04-07T15:00:00.000Z");
        for section in &doc.sections {
            if section.kind == SectionKind::MeetingDetails {
                assert!(!section.is_placeholder());
            } else {
                assert!(section.is_placeholder(), "{:?} should be a placeholder", section.kind);
            }
        }
        assert_eq!(doc.to_markdown().matches(NO_DATA).count(), 7);
    }

    #[test]
    fn agenda_only_fills_agenda_sections() {
        let agenda = full_agenda();
        let doc = compose_at(Some(&agenda), None, "2026-04-07T15:00:00.000Z");

        assert_eq!(
            doc.section(SectionKind::Objectives).unwrap().body,
            SectionBody::Paragraphs(vec!["Agree the Q2 roadmap.".to_string()])
        );
        assert!(doc.section(SectionKind::Decisions).unwrap().is_placeholder());
        assert!(doc.section(SectionKind::ExecutiveSummary).unwrap().is_placeholder());
        assert_eq!(
            doc.section(SectionKind::Risks).unwrap().body,
            SectionBody::Bullets(vec!["Vendor contract expires in May".to_string()])
        );
        // Falls back to the agenda's pre-meeting action items.
        let SectionBody::Table { rows, .. } = &doc.section(SectionKind::ActionItems).unwrap().body
        else {
            panic!("action items should be a table");
        };
        assert_eq!(rows[0][0], "Circulate draft");
        assert_eq!(rows[0][2], "Sunday, 5 April 2026");
        // The closing text still appears once an agenda exists.
        assert!(!doc.section(SectionKind::Conclusion).unwrap().is_placeholder());
    }

    #[test]
    fn minutes_action_items_win_over_agenda() {
        let agenda = full_agenda();
        let minutes = snapshot(MinutesContent {
            attendees: vec!["Ana".to_string(), " ".to_string(), "Raj".to_string()],
            discussion: "Roadmap accepted with changes.".to_string(),
            decisions: vec!["Ship beta in June".to_string()],
            action_items: vec![ActionItem {
                task: "Update roadmap".to_string(),
                assignee: "Ana".to_string(),
                due_date: None,
            }],
            next_meeting: Some("2026-05-05T14:00:00Z".to_string()),
        });
        let doc = compose_at(Some(&agenda), Some(&minutes), "2026-04-07T15:00:00.000Z");

        let SectionBody::Table { rows, .. } = &doc.section(SectionKind::ActionItems).unwrap().body
        else {
            panic!("action items should be a table");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["Update roadmap", "Ana", "Not set"]);

        let SectionBody::Fields(fields) = &doc.section(SectionKind::MeetingDetails).unwrap().body
        else {
            panic!("details should be fields");
        };
        assert!(fields.contains(&("Attendees".to_string(), "Ana, Raj".to_string())));

        let SectionBody::Paragraphs(conclusion) =
            &doc.section(SectionKind::Conclusion).unwrap().body
        else {
            panic!("conclusion should have text");
        };
        assert_eq!(
            conclusion.last().unwrap(),
            "Next meeting: Tuesday, 5 May 2026, 14:00 UTC"
        );
    }

    #[test]
    fn empty_minutes_items_fall_back_to_agenda() {
        let agenda = full_agenda();
        let minutes = snapshot(MinutesContent {
            action_items: vec![ActionItem::default()],
            ..MinutesContent::default()
        });
        let doc = compose_at(Some(&agenda), Some(&minutes), "2026-04-07T15:00:00.000Z");
        let SectionBody::Table { rows, .. } = &doc.section(SectionKind::ActionItems).unwrap().body
        else {
            panic!("action items should be a table");
        };
        assert_eq!(rows[0][0], "Circulate draft");
    }

    #[test]
    fn output_differs_only_in_the_footer() {
        let agenda = full_agenda();
        let early = compose_at(Some(&agenda), None, "2026-04-07T15:00:00.000Z");
        let late = compose_at(Some(&agenda), None, "2026-04-09T08:30:00.000Z");

        assert_eq!(early.body_markdown(), late.body_markdown());
        assert_ne!(early.to_markdown(), late.to_markdown());
        assert_eq!(
            early.to_html(),
            early.clone().to_html(),
            "rendering the same document twice must match"
        );
        let early_html = early.to_html();
        let late_html = late.to_html();
        let footer = early_html.find("<hr").unwrap();
        assert_eq!(early_html[..footer], late_html[..footer]);
    }

    #[test]
    fn document_text_is_never_markup() {
        let minutes = snapshot(MinutesContent {
            discussion: "<script>alert(1)</script> | *bold*".to_string(),
            decisions: vec!["- not a nested list".to_string(), "1. not numbered".to_string()],
            ..MinutesContent::default()
        });
        let doc = compose_at(None, Some(&minutes), "2026-04-07T15:00:00.000Z");
        let html = doc.to_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<em>bold</em>"));
        assert!(html.contains("<li>- not a nested list</li>"));
        assert!(html.contains("<li>1. not numbered</li>"));
    }

    #[test]
    fn html_has_tables_and_title() {
        let agenda = full_agenda();
        let doc = compose_at(Some(&agenda), None, "2026-04-07T15:00:00.000Z");
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Meeting Report: Q2 Planning</title>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<h2>Key Discussion Points</h2>"));
        assert!(html.contains("20 min"));
    }
}
