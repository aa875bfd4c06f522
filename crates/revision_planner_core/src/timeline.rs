//! crates/revision_planner_core/src/timeline.rs
//!
//! Builds the per-subject exam timelines for one planning run and the order in
//! which the allocation passes visit subjects.

use crate::catalog::{ExamEntry, ExamTable};
use crate::error::{PlannerError, PlannerResult};
use crate::settings::PlannerSettings;
use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;

/// One parsed exam sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledExam {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub explicit_time: bool,
}

/// The chronologically ordered exams of one selected subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTimeline {
    subject: String,
    exams: Vec<ScheduledExam>,
}

impl SubjectTimeline {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn exams(&self) -> &[ScheduledExam] {
        &self.exams
    }

    pub fn exam_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.exams.iter().map(|exam| exam.date)
    }

    /// The latest exam, or `None` for a subject missing from the exam table.
    pub fn final_exam(&self) -> Option<NaiveDate> {
        self.exams.last().map(|exam| exam.date)
    }

    /// The first exam strictly after `day`.
    pub fn next_exam_after(&self, day: NaiveDate) -> Option<NaiveDate> {
        self.exam_dates().find(|date| *date > day)
    }
}

/// Every selected subject's timeline, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamTimeline {
    selection: Vec<String>,
    ordered: Vec<SubjectTimeline>,
}

impl ExamTimeline {
    /// The selected subjects in the order the student picked them.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Timelines sorted by final exam, earliest first. Ties keep selection
    /// order; subjects without exams come last.
    pub fn processing_order(&self) -> &[SubjectTimeline] {
        &self.ordered
    }

    pub fn get(&self, subject: &str) -> Option<&SubjectTimeline> {
        self.ordered.iter().find(|t| t.subject == subject)
    }
}

/// Resolves `selection` against `table`.
///
/// Repeated subjects keep their first position. A subject the table does not
/// know gets an empty timeline rather than an error.
pub fn build_timelines<S: AsRef<str>>(
    table: &ExamTable,
    selection: &[S],
    settings: &PlannerSettings,
) -> PlannerResult<ExamTimeline> {
    let mut unique: Vec<String> = Vec::with_capacity(selection.len());
    for subject in selection {
        let subject = subject.as_ref();
        if !unique.iter().any(|s| s == subject) {
            unique.push(subject.to_string());
        }
    }

    let mut ordered = unique
        .iter()
        .map(|subject| {
            let entries = table.exams_for(subject).unwrap_or_default();
            let mut exams = entries
                .iter()
                .map(|entry| parse_entry(subject, entry, settings.default_exam_time))
                .collect::<PlannerResult<Vec<_>>>()?;
            exams.sort();
            exams.dedup();
            if exams.is_empty() {
                tracing::debug!(subject = %subject, "selected subject has no exam dates");
            }
            Ok(SubjectTimeline {
                subject: subject.clone(),
                exams,
            })
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    // `sort_by` is stable, so equal final exams keep selection order.
    ordered.sort_by(|a, b| match (a.final_exam(), b.final_exam()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(ExamTimeline {
        selection: unique,
        ordered,
    })
}

fn parse_entry(
    subject: &str,
    entry: &ExamEntry,
    default_time: NaiveTime,
) -> PlannerResult<ScheduledExam> {
    let date = NaiveDate::parse_from_str(entry.date.trim(), "%Y-%m-%d").map_err(|e| {
        PlannerError::DateParse {
            subject: subject.to_string(),
            value: entry.date.clone(),
            reason: e.to_string(),
        }
    })?;
    let (time, explicit_time) = match &entry.time {
        Some(raw) => {
            let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
                PlannerError::TimeParse {
                    subject: subject.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            (time, true)
        }
        None => (default_time, false),
    };
    Ok(ScheduledExam {
        date,
        time,
        explicit_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn orders_subjects_by_final_exam() {
        let table = ExamTable::gcse_2025();
        let timeline = build_timelines(
            &table,
            &["Maths", "Health and Social", "Spanish"],
            &PlannerSettings::default(),
        )
        .unwrap();

        let order: Vec<_> = timeline
            .processing_order()
            .iter()
            .map(SubjectTimeline::subject)
            .collect();
        assert_eq!(order, ["Health and Social", "Maths", "Spanish"]);
        assert_eq!(timeline.selection()[0], "Maths");
        assert_eq!(
            timeline.get("Maths").unwrap().final_exam(),
            Some(date("2025-06-11"))
        );
    }

    #[test]
    fn sorts_exam_dates_within_a_subject() {
        let table = ExamTable::new().with_exams("Art", &["2025-06-01", "2025-05-01"]);
        let timeline = build_timelines(&table, &["Art"], &PlannerSettings::default()).unwrap();
        let art = timeline.get("Art").unwrap();
        assert_eq!(
            art.exam_dates().collect::<Vec<_>>(),
            [date("2025-05-01"), date("2025-06-01")]
        );
        assert_eq!(art.next_exam_after(date("2025-05-01")), Some(date("2025-06-01")));
        assert_eq!(art.next_exam_after(date("2025-06-01")), None);
    }

    #[test]
    fn repeated_sittings_collapse_to_one() {
        let table = ExamTable::new().with_exams("Art", &["2025-06-01", "2025-05-01", "2025-06-01"]);
        let timeline = build_timelines(&table, &["Art"], &PlannerSettings::default()).unwrap();
        assert_eq!(
            timeline.get("Art").unwrap().exam_dates().collect::<Vec<_>>(),
            [date("2025-05-01"), date("2025-06-01")]
        );
    }

    #[test]
    fn unknown_subject_sorts_last_with_empty_timeline() {
        let table = ExamTable::gcse_2025();
        let timeline = build_timelines(
            &table,
            &["Astronomy", "Maths", "Maths"],
            &PlannerSettings::default(),
        )
        .unwrap();
        assert_eq!(timeline.selection(), ["Astronomy", "Maths"]);
        let last = timeline.processing_order().last().unwrap();
        assert_eq!(last.subject(), "Astronomy");
        assert!(last.exams().is_empty());
        assert_eq!(last.final_exam(), None);
    }

    #[test]
    fn malformed_date_is_fatal() {
        let table = ExamTable::new().with_exams("Art", &["2025-13-40"]);
        let err = build_timelines(&table, &["Art"], &PlannerSettings::default()).unwrap_err();
        assert!(matches!(err, PlannerError::DateParse { ref value, .. } if value == "2025-13-40"));
    }

    #[test]
    fn explicit_time_overrides_default() {
        let mut table = ExamTable::new();
        table.insert("Art", vec![ExamEntry::at("2025-05-01", "13:30")]);
        let timeline = build_timelines(&table, &["Art"], &PlannerSettings::default()).unwrap();
        let exam = timeline.get("Art").unwrap().exams()[0];
        assert!(exam.explicit_time);
        assert_eq!(exam.time, NaiveTime::from_hms_opt(13, 30, 0).unwrap());

        table.insert("Art", vec![ExamEntry::at("2025-05-01", "half past")]);
        let err = build_timelines(&table, &["Art"], &PlannerSettings::default()).unwrap_err();
        assert_eq!(err.code(), "TIME_PARSE");
    }
}
