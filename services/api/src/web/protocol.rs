//! services/api/src/web/protocol.rs
//!
//! Defines the JSON message shapes exchanged between the browser client and the
//! API server. The render feed mirrors what a month/week calendar grid needs:
//! a title, an ISO date, an `HH:MM` time and a display color per entry.

use revision_planner_core::{ExamSession, RevisionSession, Schedule, ScheduleSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// The student's choices: the subjects they sit and the hours they can study.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct ScheduleRequest {
    /// Subject names from the catalog, in the order the student picked them.
    pub subjects: Vec<String>,
    /// Weekday name (e.g. `Monday`) to hourly slot labels (e.g. `09:00`).
    #[serde(default)]
    pub availability: BTreeMap<String, Vec<String>>,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct RevisionSessionDto {
    pub title: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub color: String,
    /// `reinforcement`, `early_rotation` or `focused`.
    pub category: String,
}

impl From<&RevisionSession> for RevisionSessionDto {
    fn from(session: &RevisionSession) -> Self {
        Self {
            title: session.title(),
            subject: session.subject.clone(),
            date: session.date.format("%Y-%m-%d").to_string(),
            time: session.slot.to_string(),
            color: session.category.color().to_string(),
            category: session.category.as_str().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ExamSessionDto {
    pub title: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub color: String,
}

impl From<&ExamSession> for ExamSessionDto {
    fn from(exam: &ExamSession) -> Self {
        let event = exam.to_event();
        Self {
            title: event.title.clone(),
            subject: exam.subject.clone(),
            date: exam.date.format("%Y-%m-%d").to_string(),
            time: exam.time.format("%H:%M").to_string(),
            color: event.color().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub struct SummaryDto {
    pub reinforcement: usize,
    pub early_rotation: usize,
    pub focused: usize,
    pub exams: usize,
}

impl From<ScheduleSummary> for SummaryDto {
    fn from(summary: ScheduleSummary) -> Self {
        Self {
            reinforcement: summary.reinforcement,
            early_rotation: summary.early_rotation,
            focused: summary.focused,
            exams: summary.exams,
        }
    }
}

/// The full render feed for one planning run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ScheduleResponse {
    pub revision_sessions: Vec<RevisionSessionDto>,
    pub exam_sessions: Vec<ExamSessionDto>,
    pub summary: SummaryDto,
}

impl From<&Schedule> for ScheduleResponse {
    fn from(schedule: &Schedule) -> Self {
        Self {
            revision_sessions: schedule.revision_sessions().iter().map(Into::into).collect(),
            exam_sessions: schedule.exam_sessions().iter().map(Into::into).collect(),
            summary: schedule.summary().into(),
        }
    }
}

/// A catalog entry offered to the student for selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SubjectDto {
    pub name: String,
    pub exam_dates: Vec<String>,
}
