//! crates/revision_planner_core/src/error.rs
//!
//! Defines the error type returned by a planning run.
//!
//! Every variant describes invalid input. Running out of slots on a day is
//! expected behavior and never surfaces here.

/// A fatal configuration error that aborts a planning run before any session
/// is produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Invalid exam date '{value}' for {subject}: {reason}")]
    DateParse {
        subject: String,
        value: String,
        reason: String,
    },
    #[error("Invalid exam time '{value}' for {subject}: {reason}")]
    TimeParse {
        subject: String,
        value: String,
        reason: String,
    },
    #[error("At least one subject must be selected")]
    EmptySelection,
    #[error("Availability must name at least one weekday")]
    EmptyAvailability,
    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),
    #[error("Unknown time slot: {0} (expected an hourly label between 08:00 and 21:00)")]
    UnknownSlot(String),
    #[error("Invalid horizon: {end} is before {start}")]
    InvalidHorizon { start: String, end: String },
}

impl PlannerError {
    /// A short machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            PlannerError::DateParse { .. } => "DATE_PARSE",
            PlannerError::TimeParse { .. } => "TIME_PARSE",
            PlannerError::EmptySelection => "EMPTY_SELECTION",
            PlannerError::EmptyAvailability => "EMPTY_AVAILABILITY",
            PlannerError::UnknownWeekday(_) => "UNKNOWN_WEEKDAY",
            PlannerError::UnknownSlot(_) => "UNKNOWN_SLOT",
            PlannerError::InvalidHorizon { .. } => "INVALID_HORIZON",
        }
    }
}

/// A convenience type alias for `Result<T, PlannerError>`.
pub type PlannerResult<T> = Result<T, PlannerError>;
