//! JSON endpoints.

use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use handbook_core::{extract, HandbookRecord};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HandbookListRes {
    pub course_codes: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Handbook tool is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/handbooks",
    responses(
        (status = 200, description = "Course codes with a handbook", body = HandbookListRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List the course codes that have a handbook document.
///
/// # Errors
/// Returns `500 Internal Server Error` if the data directory cannot be read.
#[axum::debug_handler]
pub async fn list_handbooks(
    State(state): State<AppState>,
) -> Result<Json<HandbookListRes>, (StatusCode, &'static str)> {
    match state.store.course_codes() {
        Ok(course_codes) => Ok(Json(HandbookListRes { course_codes })),
        Err(e) => {
            tracing::error!("List handbooks error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/handbooks/{code}",
    params(
        ("code" = String, Path, description = "Course code, for example EDET100")
    ),
    responses(
        (status = 200, description = "Extracted handbook record", body = HandbookRecord),
        (status = 404, description = "No handbook for this course"),
        (status = 500, description = "Internal server error")
    )
)]
/// Extracted handbook record for a course.
///
/// # Errors
/// Returns `404 Not Found` if the course has no usable handbook document, and
/// `500 Internal Server Error` if the file cannot be read.
#[axum::debug_handler]
pub async fn get_handbook(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<HandbookRecord>, (StatusCode, &'static str)> {
    let document = state.store.load_optional(&code).map_err(|e| {
        tracing::error!("Load handbook error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    document
        .as_ref()
        .and_then(extract)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Handbook not found"))
}
