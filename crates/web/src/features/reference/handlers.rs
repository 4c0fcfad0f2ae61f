use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use catalog::models::{Department, Program, SemesterInfo};
use storage::services::payload::{SortDirection, map_payload_to_array};

use crate::error::WebError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/reference/departments",
    responses(
        (status = 200, description = "Departments ordered by name", body = Vec<Department>)
    ),
    tag = "reference"
)]
pub async fn list_departments(State(state): State<AppState>) -> Result<Response, WebError> {
    let departments = state.catalog.departments().await?;

    Ok(Json(map_payload_to_array(departments, Some("name"), SortDirection::Asc)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/reference/programs",
    responses(
        (status = 200, description = "Degree programs ordered by name", body = Vec<Program>)
    ),
    tag = "reference"
)]
pub async fn list_programs(State(state): State<AppState>) -> Result<Response, WebError> {
    let programs = state.catalog.programs().await?;

    Ok(Json(map_payload_to_array(programs, Some("name"), SortDirection::Asc)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/reference/semesters",
    responses(
        (status = 200, description = "Semesters ordered by term", body = Vec<SemesterInfo>)
    ),
    tag = "reference"
)]
pub async fn list_semesters(State(state): State<AppState>) -> Result<Response, WebError> {
    let semesters = state.catalog.semesters().await?;

    Ok(Json(map_payload_to_array(semesters, Some("term"), SortDirection::Asc)).into_response())
}
