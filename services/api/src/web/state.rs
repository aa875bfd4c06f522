//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use revision_planner_core::{CalendarExportService, ExamTable};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Subject catalog and exam dates every planning run resolves against.
    pub exam_table: Arc<ExamTable>,
    pub exporter: Arc<dyn CalendarExportService>,
}
