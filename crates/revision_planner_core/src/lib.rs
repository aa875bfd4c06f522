pub mod calendar;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod ports;
pub mod scheduler;
pub mod settings;
pub mod timeline;

pub use catalog::{ExamEntry, ExamTable};
pub use domain::{
    Availability, CalendarEvent, EventKind, ExamSession, RevisionSession, SessionCategory,
    TimeSlot,
};
pub use error::{PlannerError, PlannerResult};
pub use ports::{CalendarExportService, ExportedCalendar, PortError, PortResult};
pub use scheduler::{plan, PlanRequest, RotationCursor, Schedule, ScheduleSummary};
pub use settings::PlannerSettings;
pub use timeline::{build_timelines, ExamTimeline, SubjectTimeline};
