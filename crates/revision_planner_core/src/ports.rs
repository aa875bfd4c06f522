//! crates/revision_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the collaborators that consume a
//! finished schedule. The core never renders or serializes a calendar itself;
//! adapters implementing these traits live outside this crate.

use crate::scheduler::Schedule;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Export failed: {0}")]
    Export(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A calendar file produced by an export adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedCalendar {
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait CalendarExportService: Send + Sync {
    /// Serializes every exam and revision session of `schedule` into one file.
    async fn export(&self, schedule: &Schedule) -> PortResult<ExportedCalendar>;
}
