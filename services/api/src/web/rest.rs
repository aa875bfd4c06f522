//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::protocol::{
    ExamSessionDto, RevisionSessionDto, ScheduleRequest, ScheduleResponse, SubjectDto, SummaryDto,
};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use revision_planner_core::{plan, Availability, PlanRequest, Schedule, TimeSlot};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_subjects_handler,
        list_time_slots_handler,
        create_schedule_handler,
        export_schedule_handler,
    ),
    components(
        schemas(
            ScheduleRequest,
            ScheduleResponse,
            RevisionSessionDto,
            ExamSessionDto,
            SummaryDto,
            SubjectDto,
            ErrorBody
        )
    ),
    tags(
        (name = "Revision Planner API", description = "Builds revision calendars ahead of a fixed exam season.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up")))]
pub async fn health_handler() -> &'static str {
    "ok"
}

/// List the subject catalog with each subject's exam dates.
#[utoipa::path(
    get,
    path = "/subjects",
    responses((status = 200, description = "Catalog subjects", body = [SubjectDto]))
)]
pub async fn list_subjects_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<SubjectDto>> {
    let table = &app_state.exam_table;
    let subjects = table
        .subjects()
        .iter()
        .map(|name| SubjectDto {
            name: name.clone(),
            exam_dates: table
                .exams_for(name)
                .unwrap_or_default()
                .iter()
                .map(|entry| entry.date.clone())
                .collect(),
        })
        .collect();
    Json(subjects)
}

/// List the hourly slot labels a student can offer.
#[utoipa::path(
    get,
    path = "/time-slots",
    responses((status = 200, description = "Hourly slot labels", body = [String]))
)]
pub async fn list_time_slots_handler() -> Json<Vec<String>> {
    Json(TimeSlot::all().map(|slot| slot.to_string()).collect())
}

/// Plan a revision calendar and return it as a render feed.
#[utoipa::path(
    post,
    path = "/schedule",
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Schedule planned", body = ScheduleResponse),
        (status = 400, description = "Invalid selection or availability", body = ErrorBody)
    )
)]
pub async fn create_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let schedule = run_planner(&app_state, request)?;
    Ok(Json(ScheduleResponse::from(&schedule)))
}

/// Plan a revision calendar and download it as an iCalendar file.
#[utoipa::path(
    post,
    path = "/schedule/ics",
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "iCalendar file", body = String, content_type = "text/calendar"),
        (status = 400, description = "Invalid selection or availability", body = ErrorBody),
        (status = 500, description = "Export failed", body = ErrorBody)
    )
)]
pub async fn export_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = run_planner(&app_state, request)?;
    let exported = app_state.exporter.export(&schedule).await?;
    info!(
        file_name = %exported.file_name,
        bytes = exported.body.len(),
        "Exported schedule"
    );
    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, exported.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    ))
}

/// Validates the request against the catalog and runs the planner.
fn run_planner(app_state: &AppState, request: ScheduleRequest) -> Result<Schedule, ApiError> {
    if let Some(unknown) = request
        .subjects
        .iter()
        .find(|subject| !app_state.exam_table.contains(subject))
    {
        return Err(ApiError::UnknownSubject(unknown.clone()));
    }
    let availability = Availability::from_labels(request.availability)?;
    let plan_request = PlanRequest::new(request.subjects, availability);
    let schedule = plan(&plan_request, &app_state.exam_table, &app_state.config.planner)?;

    let summary = schedule.summary();
    info!(
        subjects = plan_request.subjects.len(),
        weekly_slots = plan_request.availability.weekly_slot_count(),
        revision_sessions = summary.revision_total(),
        exams = summary.exams,
        "Planned revision schedule"
    );
    Ok(schedule)
}
