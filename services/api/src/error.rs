//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use revision_planner_core::{PlannerError, PortError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid planner input: bad dates, slots, weekdays or an empty selection.
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A requested subject is not part of the catalog.
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The JSON body returned with every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Planner(e) => (StatusCode::BAD_REQUEST, e.code()),
            ApiError::UnknownSubject(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SUBJECT"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG"),
            ApiError::Port(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
            ApiError::Io(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }
        let body = ErrorBody {
            code: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
