//! crates/revision_planner_core/src/domain.rs
//!
//! Defines the pure, core data structures of the planner.
//! These structs are independent of any transport or serialization format.

use crate::error::{PlannerError, PlannerResult};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

/// Earliest hour a student can offer for revision.
pub const FIRST_SLOT_HOUR: u8 = 8;
/// Latest hour a student can offer for revision.
pub const LAST_SLOT_HOUR: u8 = 21;

/// Display color of exam entries on the rendered calendar.
pub const EXAM_COLOR: &str = "#FF5733";

//=========================================================================================
// Time Slots and Weekly Availability
//=========================================================================================

/// One hourly revision slot, labelled `HH:00`, drawn from 08:00 to 21:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    /// Returns the slot starting at `hour`, or `None` outside the fixed range.
    pub fn from_hour(hour: u8) -> Option<Self> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
            .contains(&hour)
            .then_some(Self { hour })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Every slot label in ascending order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(|hour| TimeSlot { hour })
    }

    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

impl FromStr for TimeSlot {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PlannerError::UnknownSlot(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(unknown)?;
        if minute != "00" || hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unknown());
        }
        let hour = hour.parse::<u8>().map_err(|_| unknown())?;
        TimeSlot::from_hour(hour).ok_or_else(unknown)
    }
}

/// The slots a student offers on each weekday.
///
/// Slots are kept sorted ascending and free of duplicates, so the first slot of
/// a day is always its earliest hour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    slots: [Vec<TimeSlot>; 7],
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Availability::set`].
    pub fn with_slots(mut self, weekday: Weekday, slots: impl IntoIterator<Item = TimeSlot>) -> Self {
        self.set(weekday, slots);
        self
    }

    /// Replaces the slots offered on `weekday`.
    pub fn set(&mut self, weekday: Weekday, slots: impl IntoIterator<Item = TimeSlot>) {
        let day = &mut self.slots[weekday.num_days_from_monday() as usize];
        *day = slots.into_iter().collect();
        day.sort_unstable();
        day.dedup();
    }

    /// Adds `slot` to `weekday` if absent, removes it otherwise.
    pub fn toggle(&mut self, weekday: Weekday, slot: TimeSlot) {
        let day = &mut self.slots[weekday.num_days_from_monday() as usize];
        match day.binary_search(&slot) {
            Ok(pos) => {
                day.remove(pos);
            }
            Err(pos) => day.insert(pos, slot),
        }
    }

    pub fn slots_for(&self, weekday: Weekday) -> &[TimeSlot] {
        &self.slots[weekday.num_days_from_monday() as usize]
    }

    /// Total number of slots offered across one week.
    pub fn weekly_slot_count(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Parses a raw `weekday name -> [slot label]` map as supplied by a client.
    ///
    /// A map without any weekday is rejected; weekdays with empty lists are fine.
    pub fn from_labels<I, K, S, V>(raw: I) -> PlannerResult<Self>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut availability = Self::new();
        let mut seen_weekday = false;
        for (name, labels) in raw {
            let name = name.as_ref();
            let weekday = name
                .trim()
                .parse::<Weekday>()
                .map_err(|_| PlannerError::UnknownWeekday(name.to_string()))?;
            let slots = labels
                .into_iter()
                .map(|label| label.as_ref().parse::<TimeSlot>())
                .collect::<PlannerResult<Vec<_>>>()?;
            let mut merged = availability.slots_for(weekday).to_vec();
            merged.extend(slots);
            availability.set(weekday, merged);
            seen_weekday = true;
        }
        if !seen_weekday {
            return Err(PlannerError::EmptyAvailability);
        }
        Ok(availability)
    }
}

//=========================================================================================
// Scheduled Sessions
//=========================================================================================

/// The allocation pass that produced a revision session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCategory {
    /// Revision on the day immediately before an exam.
    Reinforcement,
    /// Round-robin revision before the focus phase starts.
    EarlyRotation,
    /// Revision of the subject with the nearest upcoming exam.
    Focused,
}

impl SessionCategory {
    pub fn color(&self) -> &'static str {
        match self {
            SessionCategory::Reinforcement => "#1E40AF",
            SessionCategory::EarlyRotation => "#3B82F6",
            SessionCategory::Focused => "#60A5FA",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCategory::Reinforcement => "reinforcement",
            SessionCategory::EarlyRotation => "early_rotation",
            SessionCategory::Focused => "focused",
        }
    }
}

/// A one-hour revision session placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionSession {
    pub subject: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub category: SessionCategory,
}

impl RevisionSession {
    pub fn title(&self) -> String {
        format!("Revise {}", self.subject)
    }

    pub fn to_event(&self) -> CalendarEvent {
        CalendarEvent {
            title: self.title(),
            date: self.date,
            time: self.slot.start_time(),
            kind: EventKind::Revision(self.category),
        }
    }
}

/// A sitting of a timed examination. Exams are fixed facts, never allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSession {
    pub subject: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Whether `time` came from the exam table rather than the default.
    pub explicit_time: bool,
}

impl ExamSession {
    pub fn title(&self) -> String {
        if self.explicit_time {
            format!("{} Exam – {}", self.subject, self.time.format("%H:%M"))
        } else {
            format!("{} Exam", self.subject)
        }
    }

    pub fn to_event(&self) -> CalendarEvent {
        CalendarEvent {
            title: self.title(),
            date: self.date,
            time: self.time,
            kind: EventKind::Exam,
        }
    }
}

//=========================================================================================
// Render / Export Records
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Exam,
    Revision(SessionCategory),
}

/// The flattened record handed to rendering and export collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: EventKind,
}

impl CalendarEvent {
    pub fn color(&self) -> &'static str {
        match self.kind {
            EventKind::Exam => EXAM_COLOR,
            EventKind::Revision(category) => category.color(),
        }
    }

    pub fn is_exam(&self) -> bool {
        matches!(self.kind, EventKind::Exam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hourly_slot_labels() {
        assert_eq!("09:00".parse::<TimeSlot>().unwrap().hour(), 9);
        assert_eq!("21:00".parse::<TimeSlot>().unwrap().to_string(), "21:00");
        assert_eq!(TimeSlot::all().count(), 14);
    }

    #[test]
    fn rejects_labels_outside_the_fixed_set() {
        for label in ["07:00", "22:00", "09:30", "9:00", "+9:00", "-1:00", "noon", ""] {
            assert_eq!(
                label.parse::<TimeSlot>(),
                Err(PlannerError::UnknownSlot(label.to_string())),
                "{label} should be rejected"
            );
        }
    }

    #[test]
    fn availability_keeps_slots_sorted_and_unique() {
        let slot = |s: &str| s.parse::<TimeSlot>().unwrap();
        let availability = Availability::new().with_slots(
            Weekday::Tue,
            [slot("18:00"), slot("09:00"), slot("18:00")],
        );
        assert_eq!(availability.slots_for(Weekday::Tue), &[slot("09:00"), slot("18:00")]);
        assert!(availability.slots_for(Weekday::Wed).is_empty());
        assert_eq!(availability.weekly_slot_count(), 2);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let slot = TimeSlot::from_hour(10).unwrap();
        let mut availability = Availability::new();
        availability.toggle(Weekday::Sat, slot);
        assert_eq!(availability.slots_for(Weekday::Sat), &[slot]);
        availability.toggle(Weekday::Sat, slot);
        assert!(availability.slots_for(Weekday::Sat).is_empty());
    }

    #[test]
    fn from_labels_accepts_full_and_short_weekday_names() {
        let availability =
            Availability::from_labels([("Monday", vec!["09:00"]), ("sat", vec!["14:00", "08:00"])])
                .unwrap();
        assert_eq!(availability.slots_for(Weekday::Mon).len(), 1);
        assert_eq!(availability.slots_for(Weekday::Sat)[0].hour(), 8);
    }

    #[test]
    fn from_labels_rejects_unknown_weekday_and_empty_map() {
        let err = Availability::from_labels([("Funday", vec!["09:00"])]).unwrap_err();
        assert_eq!(err, PlannerError::UnknownWeekday("Funday".to_string()));

        let empty: Vec<(String, Vec<String>)> = Vec::new();
        assert_eq!(
            Availability::from_labels(empty).unwrap_err(),
            PlannerError::EmptyAvailability
        );
    }

    #[test]
    fn exam_title_mentions_explicit_time_only() {
        let mut exam = ExamSession {
            subject: "Maths".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            explicit_time: false,
        };
        assert_eq!(exam.title(), "Maths Exam");
        exam.time = NaiveTime::from_hms_opt(13, 30, 0).unwrap();
        exam.explicit_time = true;
        assert_eq!(exam.title(), "Maths Exam – 13:30");
        assert_eq!(exam.to_event().color(), EXAM_COLOR);
    }
}
