//! crates/revision_planner_core/src/scheduler.rs
//!
//! The revision allocation algorithm.
//!
//! A run executes strictly in sequence:
//! 1. build the exam timelines and the subject processing order,
//! 2. book one reinforcement session on the day before every exam,
//! 3. fill the early phase with a continuous round-robin over the selection,
//! 4. fill the focus phase with the subjects whose next exam is nearest,
//! 5. list the exam sittings themselves.
//!
//! All passes share one [`Calendar`], so a slot or subject booked by an
//! earlier pass is visible to every later one.

use crate::calendar::Calendar;
use crate::catalog::ExamTable;
use crate::domain::{Availability, CalendarEvent, ExamSession, RevisionSession, SessionCategory};
use crate::error::{PlannerError, PlannerResult};
use crate::settings::PlannerSettings;
use crate::timeline::{build_timelines, ExamTimeline};
use chrono::NaiveDate;
use tracing::debug;

//=========================================================================================
// Inputs and Outputs
//=========================================================================================

/// What the student supplies: the subjects they sit and when they can study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub subjects: Vec<String>,
    pub availability: Availability,
}

impl PlanRequest {
    pub fn new<S: Into<String>>(subjects: impl IntoIterator<Item = S>, availability: Availability) -> Self {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            availability,
        }
    }
}

/// Session counts of a finished schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub reinforcement: usize,
    pub early_rotation: usize,
    pub focused: usize,
    pub exams: usize,
}

impl ScheduleSummary {
    pub fn revision_total(&self) -> usize {
        self.reinforcement + self.early_rotation + self.focused
    }
}

/// The result of a planning run. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    revision_sessions: Vec<RevisionSession>,
    exam_sessions: Vec<ExamSession>,
}

impl Schedule {
    /// Revision sessions in the order the passes created them.
    pub fn revision_sessions(&self) -> &[RevisionSession] {
        &self.revision_sessions
    }

    pub fn exam_sessions(&self) -> &[ExamSession] {
        &self.exam_sessions
    }

    pub fn sessions_on(&self, date: NaiveDate) -> impl Iterator<Item = &RevisionSession> {
        self.revision_sessions.iter().filter(move |s| s.date == date)
    }

    pub fn sessions_for<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a RevisionSession> {
        self.revision_sessions.iter().filter(move |s| s.subject == subject)
    }

    pub fn summary(&self) -> ScheduleSummary {
        let mut summary = ScheduleSummary {
            exams: self.exam_sessions.len(),
            ..ScheduleSummary::default()
        };
        for session in &self.revision_sessions {
            match session.category {
                SessionCategory::Reinforcement => summary.reinforcement += 1,
                SessionCategory::EarlyRotation => summary.early_rotation += 1,
                SessionCategory::Focused => summary.focused += 1,
            }
        }
        summary
    }

    /// Exams first, then revision sessions in creation order.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.exam_sessions
            .iter()
            .map(ExamSession::to_event)
            .chain(self.revision_sessions.iter().map(RevisionSession::to_event))
            .collect()
    }
}

//=========================================================================================
// Round-Robin Cursor
//=========================================================================================

/// Position of the early-phase rotation. It is shared across every day of the
/// phase and advances on every attempt, booked or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationCursor {
    position: usize,
}

impl RotationCursor {
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the subject under the cursor and moves past it.
    pub fn advance<'a>(&mut self, subjects: &'a [String]) -> Option<&'a str> {
        if subjects.is_empty() {
            return None;
        }
        let subject = &subjects[self.position % subjects.len()];
        self.position += 1;
        Some(subject)
    }
}

//=========================================================================================
// Planning Run
//=========================================================================================

/// Plans a full revision calendar.
///
/// Fails only on invalid input. A day that runs out of slots simply leaves the
/// remaining subjects unbooked.
pub fn plan(
    request: &PlanRequest,
    table: &ExamTable,
    settings: &PlannerSettings,
) -> PlannerResult<Schedule> {
    settings.validate()?;
    if request.subjects.is_empty() {
        return Err(PlannerError::EmptySelection);
    }

    let timeline = build_timelines(table, request.subjects.as_slice(), settings)?;
    let mut run = PlanningRun::new(*settings, &request.availability);

    run.reinforce_exams(&timeline);
    let mut cursor = RotationCursor::default();
    run.rotate_early_phase(timeline.selection(), &mut cursor);
    run.focus_on_upcoming_exams(&timeline);

    let schedule = Schedule {
        revision_sessions: run.sessions,
        exam_sessions: exam_sessions(&timeline),
    };
    let summary = schedule.summary();
    debug!(
        subjects = timeline.selection().len(),
        reinforcement = summary.reinforcement,
        early_rotation = summary.early_rotation,
        focused = summary.focused,
        exams = summary.exams,
        "planning run complete"
    );
    Ok(schedule)
}

/// State owned by one planning run.
struct PlanningRun {
    settings: PlannerSettings,
    calendar: Calendar,
    sessions: Vec<RevisionSession>,
}

impl PlanningRun {
    fn new(settings: PlannerSettings, availability: &Availability) -> Self {
        Self {
            settings,
            calendar: Calendar::new(&settings, availability),
            sessions: Vec::new(),
        }
    }

    /// Books each subject on the day before each of its exams.
    ///
    /// Subjects are visited in final-exam order, not by the date of the exam
    /// being covered, so on a crowded day a subject with a late final exam can
    /// lose an early sitting's slot to a subject visited first.
    fn reinforce_exams(&mut self, timeline: &ExamTimeline) {
        let mut skipped = 0usize;
        for subject in timeline.processing_order() {
            for exam_date in subject.exam_dates() {
                let Some(day) = exam_date
                    .pred_opt()
                    .and_then(|before| self.calendar.day_mut(before))
                else {
                    continue;
                };
                match day.book(subject.subject(), SessionCategory::Reinforcement) {
                    Some(session) => self.sessions.push(session),
                    None => skipped += 1,
                }
            }
        }
        debug!(skipped, "reinforcement pass done");
    }

    /// Fills free capacity before the focus phase, one rotation attempt per
    /// free slot.
    fn rotate_early_phase(&mut self, subjects: &[String], cursor: &mut RotationCursor) {
        let settings = self.settings;
        for day in self
            .calendar
            .days_mut()
            .iter_mut()
            .filter(|day| settings.is_early_phase(day.date()))
        {
            for _ in 0..day.remaining_capacity() {
                let Some(subject) = cursor.advance(subjects) else {
                    return;
                };
                if let Some(session) = day.book(subject, SessionCategory::EarlyRotation) {
                    self.sessions.push(session);
                }
            }
        }
        debug!(attempts = cursor.position(), "early rotation pass done");
    }

    /// Fills free capacity from the focus phase onward with the first subject,
    /// in processing order, that still has an exam ahead and is not booked yet.
    fn focus_on_upcoming_exams(&mut self, timeline: &ExamTimeline) {
        let settings = self.settings;
        for day in self
            .calendar
            .days_mut()
            .iter_mut()
            .filter(|day| !settings.is_early_phase(day.date()))
        {
            for _ in 0..day.remaining_capacity() {
                let candidate = timeline.processing_order().iter().find(|t| {
                    t.next_exam_after(day.date()).is_some() && !day.has_subject(t.subject())
                });
                // Candidates only shrink within a day, so the rest stays empty too.
                let Some(candidate) = candidate else {
                    break;
                };
                if let Some(session) = day.book(candidate.subject(), SessionCategory::Focused) {
                    self.sessions.push(session);
                }
            }
        }
    }
}

/// One exam session per exam of every selected subject, in selection order.
///
/// Ordering follows the student's picks rather than the exam table's own
/// subject order, so the feed lists exams the way the selection was made.
fn exam_sessions(timeline: &ExamTimeline) -> Vec<ExamSession> {
    timeline
        .selection()
        .iter()
        .filter_map(|subject| timeline.get(subject))
        .flat_map(|t| {
            t.exams().iter().map(move |exam| ExamSession {
                subject: t.subject().to_string(),
                date: exam.date,
                time: exam.time,
                explicit_time: exam.explicit_time,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeSlot;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn slots(hours: &[u8]) -> Vec<TimeSlot> {
        hours.iter().map(|h| TimeSlot::from_hour(*h).unwrap()).collect()
    }

    #[test]
    fn rotation_cursor_wraps_and_counts_every_attempt() {
        let subjects = vec!["A".to_string(), "B".to_string()];
        let mut cursor = RotationCursor::default();
        let picked: Vec<_> = (0..5).filter_map(|_| cursor.advance(&subjects)).collect();
        assert_eq!(picked, ["A", "B", "A", "B", "A"]);
        assert_eq!(cursor.position(), 5);
        assert_eq!(RotationCursor::default().advance(&[]), None);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let request = PlanRequest::new(Vec::<String>::new(), Availability::new());
        let err = plan(&request, &ExamTable::gcse_2025(), &PlannerSettings::default()).unwrap_err();
        assert_eq!(err, PlannerError::EmptySelection);
    }

    #[test]
    fn exam_sessions_follow_selection_not_table_order() {
        // Maths precedes Art in the table and sits earlier, but Art was picked first.
        let table = ExamTable::new()
            .with_exams("Maths", &["2025-05-15"])
            .with_exams("Art", &["2025-06-20", "2025-05-30"]);
        let request = PlanRequest::new(["Art", "Maths"], Availability::new());
        let schedule = plan(&request, &table, &PlannerSettings::default()).unwrap();
        let exams: Vec<_> = schedule
            .exam_sessions()
            .iter()
            .map(|e| (e.subject.as_str(), e.date))
            .collect();
        assert_eq!(
            exams,
            [
                ("Art", date("2025-05-30")),
                ("Art", date("2025-06-20")),
                ("Maths", date("2025-05-15")),
            ]
        );
    }

    #[test]
    fn early_rotation_cursor_is_not_reset_per_day() {
        // C's reinforcement fills one of the two slots on 2025-04-12, and the
        // single rotation attempt left that day lands on C itself.
        let table = ExamTable::new()
            .with_exams("A", &["2025-07-01"])
            .with_exams("B", &["2025-07-01"])
            .with_exams("C", &["2025-04-13"]);
        let availability = Availability::new().with_slots(Weekday::Sat, slots(&[9, 10]));
        let request = PlanRequest::new(["A", "B", "C"], availability);
        let schedule = plan(&request, &table, &PlannerSettings::default()).unwrap();

        let early: Vec<_> = schedule
            .revision_sessions()
            .iter()
            .filter(|s| s.category == SessionCategory::EarlyRotation)
            .map(|s| (s.date, s.subject.as_str()))
            .collect();
        assert_eq!(
            early,
            [
                (date("2025-04-05"), "A"),
                (date("2025-04-05"), "B"),
                (date("2025-04-19"), "A"),
                (date("2025-04-19"), "B"),
            ]
        );
        let eve: Vec<_> = schedule.sessions_on(date("2025-04-12")).collect();
        assert_eq!(eve.len(), 1);
        assert_eq!(eve[0].category, SessionCategory::Reinforcement);
    }

    #[test]
    fn focused_phase_prefers_nearest_final_exam() {
        let table = ExamTable::new()
            .with_exams("Late", &["2025-06-20"])
            .with_exams("Soon", &["2025-05-01"]);
        let availability = Availability::new().with_slots(Weekday::Tue, slots(&[18]));
        let request = PlanRequest::new(["Late", "Soon"], availability);
        let schedule = plan(&request, &table, &PlannerSettings::default()).unwrap();

        let on = |d: &str| {
            schedule
                .sessions_on(date(d))
                .map(|s| s.subject.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(on("2025-04-22"), ["Soon"]);
        assert_eq!(on("2025-04-29"), ["Soon"]);
        // Exam passed; the next candidate takes over.
        assert_eq!(on("2025-05-06"), ["Late"]);
        // No subject has an exam ahead any more.
        assert!(on("2025-06-24").is_empty());
    }

    #[test]
    fn reinforcement_takes_the_earliest_free_slot() {
        let table = ExamTable::new()
            .with_exams("A", &["2025-05-15"])
            .with_exams("B", &["2025-05-15"]);
        let availability = Availability::new().with_slots(Weekday::Wed, slots(&[17, 9]));
        let request = PlanRequest::new(["A", "B"], availability);
        let schedule = plan(&request, &table, &PlannerSettings::default()).unwrap();

        let eve: Vec<_> = schedule.sessions_on(date("2025-05-14")).collect();
        assert_eq!(eve.len(), 2);
        assert_eq!((eve[0].subject.as_str(), eve[0].slot.hour()), ("A", 9));
        assert_eq!((eve[1].subject.as_str(), eve[1].slot.hour()), ("B", 17));
        assert!(eve
            .iter()
            .all(|s| s.category == SessionCategory::Reinforcement));
    }

    #[test]
    fn summary_counts_each_category() {
        let availability = Availability::new().with_slots(Weekday::Mon, slots(&[9]));
        let request = PlanRequest::new(["Maths"], availability);
        let schedule =
            plan(&request, &ExamTable::gcse_2025(), &PlannerSettings::default()).unwrap();
        let summary = schedule.summary();
        assert_eq!(summary.exams, 3);
        assert_eq!(summary.early_rotation, 2);
        assert_eq!(summary.revision_total(), schedule.revision_sessions().len());
        assert_eq!(schedule.events().len(), summary.revision_total() + summary.exams);
        assert!(schedule.events()[0].is_exam());
    }
}
