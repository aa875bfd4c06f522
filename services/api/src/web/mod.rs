pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server.
pub use rest::{
    create_schedule_handler, export_schedule_handler, health_handler, list_subjects_handler,
    list_time_slots_handler,
};
use state::AppState;

/// Builds the API routes. CORS and the Swagger UI are layered on by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/subjects", get(list_subjects_handler))
        .route("/time-slots", get(list_time_slots_handler))
        .route("/schedule", post(create_schedule_handler))
        .route("/schedule/ics", post(export_schedule_handler))
        .with_state(state)
}
