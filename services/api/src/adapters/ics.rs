//! services/api/src/adapters/ics.rs
//!
//! This module contains the iCalendar export adapter.
//! It implements the `CalendarExportService` port from the `core` crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use revision_planner_core::{
    CalendarEvent, CalendarExportService, ExportedCalendar, PortResult, Schedule,
};

/// Name under which the exported calendar is offered for download.
pub const ICS_FILE_NAME: &str = "gcse_revision_schedule.ics";
pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

const PRODUCT_ID: &str = "-//Revision Planner//Schedule Export//EN";
const UID_DOMAIN: &str = "revision-planner";
/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `CalendarExportService` port by writing an
/// RFC 5545 `VCALENDAR`.
///
/// Exams become all-day entries; revision sessions become one-hour timed
/// entries in floating local time.
#[derive(Clone, Debug, Default)]
pub struct IcsExportAdapter {
    stamp: Option<DateTime<Utc>>,
}

impl IcsExportAdapter {
    /// Creates a new `IcsExportAdapter` that stamps events with the export time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fixed `DTSTAMP`, which makes the output reproducible.
    pub fn with_stamp(stamp: DateTime<Utc>) -> Self {
        Self { stamp: Some(stamp) }
    }

    fn render(&self, schedule: &Schedule) -> String {
        let stamp = self
            .stamp
            .unwrap_or_else(Utc::now)
            .format("%Y%m%dT%H%M%SZ")
            .to_string();

        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODUCT_ID}"),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
        ];
        for event in schedule.events() {
            lines.extend(event_lines(&event, &stamp));
        }
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in lines {
            out.push_str(&fold_line(&line));
            out.push_str("\r\n");
        }
        out
    }
}

//=========================================================================================
// `CalendarExportService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CalendarExportService for IcsExportAdapter {
    async fn export(&self, schedule: &Schedule) -> PortResult<ExportedCalendar> {
        Ok(ExportedCalendar {
            file_name: ICS_FILE_NAME.to_string(),
            content_type: ICS_CONTENT_TYPE.to_string(),
            body: self.render(schedule).into_bytes(),
        })
    }
}

//=========================================================================================
// Rendering Helpers
//=========================================================================================

fn event_lines(event: &CalendarEvent, stamp: &str) -> Vec<String> {
    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid(event)),
        format!("DTSTAMP:{stamp}"),
    ];
    if event.is_exam() {
        lines.push(format!("DTSTART;VALUE=DATE:{}", event.date.format("%Y%m%d")));
    } else {
        lines.push(format!(
            "DTSTART:{}T{}",
            event.date.format("%Y%m%d"),
            event.time.format("%H%M%S")
        ));
        lines.push("DURATION:PT1H".to_string());
    }
    lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
    lines.push("STATUS:CONFIRMED".to_string());
    lines.push("END:VEVENT".to_string());
    lines
}

/// A subject is booked at most once per day and sits each exam once, so date,
/// time and title identify an event.
fn uid(event: &CalendarEvent) -> String {
    let slug: String = event
        .title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    format!(
        "{}-{}-{}@{UID_DOMAIN}",
        event.date.format("%Y%m%d"),
        event.time.format("%H%M"),
        slug
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits a content line into 75-octet chunks joined by CRLF + space, never
/// inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0usize;
    // Continuation lines start with a space, which counts towards the limit.
    let mut limit = MAX_LINE_OCTETS;
    for c in line.chars() {
        if current + c.len_utf8() > limit {
            out.push_str("\r\n ");
            current = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(c);
        current += c.len_utf8();
    }
    out
}
