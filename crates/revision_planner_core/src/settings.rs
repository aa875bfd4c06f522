//! crates/revision_planner_core/src/settings.rs
//!
//! Calendar constants of a planning run.

use crate::error::{PlannerError, PlannerResult};
use chrono::{NaiveDate, NaiveTime};

/// The calendar window and phase boundary a planning run works within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerSettings {
    /// First day that may receive a revision session.
    pub horizon_start: NaiveDate,
    /// Last day that may receive a revision session (inclusive).
    pub horizon_end: NaiveDate,
    /// Days strictly before this date use round-robin rotation; days on or
    /// after it use exam-proximity ordering.
    pub focus_start: NaiveDate,
    /// Start time given to exams whose table entry has none.
    pub default_exam_time: NaiveTime,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            horizon_start: ymd(2025, 4, 4),
            horizon_end: ymd(2025, 7, 19),
            focus_start: ymd(2025, 4, 21),
            default_exam_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl PlannerSettings {
    pub fn validate(&self) -> PlannerResult<()> {
        if self.horizon_end < self.horizon_start {
            return Err(PlannerError::InvalidHorizon {
                start: self.horizon_start.to_string(),
                end: self.horizon_end.to_string(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.horizon_start..=self.horizon_end).contains(&date)
    }

    pub fn is_early_phase(&self, date: NaiveDate) -> bool {
        date < self.focus_start
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
