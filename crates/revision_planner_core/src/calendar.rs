//! crates/revision_planner_core/src/calendar.rs
//!
//! Per-day bookkeeping shared by the allocation passes. Each `CalendarDay`
//! owns its slot list and the set of subjects already booked on it.

use crate::domain::{Availability, RevisionSession, SessionCategory, TimeSlot};
use crate::settings::PlannerSettings;
use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Booking {
    subject: String,
    slot: TimeSlot,
}

/// One date of the planning horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    date: NaiveDate,
    slots: Vec<TimeSlot>,
    bookings: Vec<Booking>,
}

impl CalendarDay {
    fn new(date: NaiveDate, availability: &Availability) -> Self {
        Self {
            date,
            slots: availability.slots_for(date.weekday()).to_vec(),
            bookings: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Slots offered on this day, earliest first.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.bookings.iter().any(|b| b.subject == subject)
    }

    pub fn booked_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.slots.len().saturating_sub(self.bookings.len())
    }

    /// The earliest slot no session occupies yet.
    pub fn first_free_slot(&self) -> Option<TimeSlot> {
        self.slots
            .iter()
            .copied()
            .find(|slot| !self.bookings.iter().any(|b| b.slot == *slot))
    }

    /// Books `subject` into the earliest free slot.
    ///
    /// Returns `None` when the subject already has a session today or every
    /// slot is taken.
    pub fn book(&mut self, subject: &str, category: SessionCategory) -> Option<RevisionSession> {
        if self.has_subject(subject) {
            return None;
        }
        let slot = self.first_free_slot()?;
        self.bookings.push(Booking {
            subject: subject.to_string(),
            slot,
        });
        Some(RevisionSession {
            subject: subject.to_string(),
            date: self.date,
            slot,
            category,
        })
    }
}

/// Every day of the planning horizon, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    start: NaiveDate,
    days: Vec<CalendarDay>,
}

impl Calendar {
    pub fn new(settings: &PlannerSettings, availability: &Availability) -> Self {
        let days = settings
            .horizon_start
            .iter_days()
            .take_while(|date| *date <= settings.horizon_end)
            .map(|date| CalendarDay::new(date, availability))
            .collect();
        Self {
            start: settings.horizon_start,
            days,
        }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn days_mut(&mut self) -> &mut [CalendarDay] {
        &mut self.days
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = usize::try_from((date - self.start).num_days()).ok()?;
        (offset < self.days.len()).then_some(offset)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.index_of(date).map(|i| &self.days[i])
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut CalendarDay> {
        self.index_of(date).map(move |i| &mut self.days[i])
    }
}
