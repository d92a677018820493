//! Roster maintenance endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use clinicdir_api::ApiError;
use clinicdir_auth::BearerAuth;
use clinicdir_core::{DepartmentDraft, DoctorDraft, DoctorRecord, HospitalDraft};
use clinicdir_search::{Page, paginate};
use serde::Deserialize;

use super::state::AdminState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

// =============================================================================
// Doctors
// =============================================================================

/// GET /doctors?page=N - One page of doctors, newest first.
pub async fn list_doctors(
    State(state): State<AdminState>,
    _admin: BearerAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<DoctorRecord>>, ApiError> {
    let fetched = state
        .directory
        .doctors()
        .await
        .map_err(|e| ApiError::from_storage(e, "Failed to fetch doctors"))?;
    let page = paginate(&fetched.data, query.page, state.page_size)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(page))
}

/// POST /doctors - Add a doctor.
pub async fn create_doctor(
    State(state): State<AdminState>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<DoctorDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let doctor = state.roster.create_doctor(draft).await?;
    tracing::info!(admin = %admin.name, id = %doctor.id, "Created doctor");
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// PUT /doctors/{id} - Replace a doctor.
pub async fn update_doctor(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<DoctorDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let doctor = state.roster.update_doctor(&id, draft).await?;
    tracing::info!(admin = %admin.name, id = %id, "Updated doctor");
    Ok(Json(doctor))
}

/// DELETE /doctors/{id}
pub async fn delete_doctor(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
) -> Result<StatusCode, ApiError> {
    state.roster.delete_doctor(&id).await?;
    tracing::info!(admin = %admin.name, id = %id, "Deleted doctor");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Hospitals
// =============================================================================

pub async fn create_hospital(
    State(state): State<AdminState>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<HospitalDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let hospital = state.roster.create_hospital(draft).await?;
    tracing::info!(admin = %admin.name, id = %hospital.id, "Created hospital");
    Ok((StatusCode::CREATED, Json(hospital)))
}

pub async fn update_hospital(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<HospitalDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let hospital = state.roster.update_hospital(&id, draft).await?;
    tracing::info!(admin = %admin.name, id = %id, "Updated hospital");
    Ok(Json(hospital))
}

/// DELETE /hospitals/{id} - Refused with 409 while doctors reference it.
pub async fn delete_hospital(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
) -> Result<StatusCode, ApiError> {
    state.roster.delete_hospital(&id).await?;
    tracing::info!(admin = %admin.name, id = %id, "Deleted hospital");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Departments
// =============================================================================

pub async fn create_department(
    State(state): State<AdminState>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<DepartmentDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let department = state.roster.create_department(draft).await?;
    tracing::info!(admin = %admin.name, id = %department.id, "Created department");
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
    Json(draft): Json<DepartmentDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let department = state.roster.update_department(&id, draft).await?;
    tracing::info!(admin = %admin.name, id = %id, "Updated department");
    Ok(Json(department))
}

/// DELETE /departments/{id} - Refused with 409 while doctors reference it.
pub async fn delete_department(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    BearerAuth(admin): BearerAuth,
) -> Result<StatusCode, ApiError> {
    state.roster.delete_department(&id).await?;
    tracing::info!(admin = %admin.name, id = %id, "Deleted department");
    Ok(StatusCode::NO_CONTENT)
}
