//! Admin routes — platform directories, org/skill management, and the
//! verification review queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::{AdminUser, AuthUser};
use crate::routes::jobs::job_error_to_status;
use crate::routes::verifications::verification_error_to_status;
use crate::services::directory::{
    self, DirectoryError, HiringManagerEntry, OrganizationRow, SkillRow, TalentEntry,
};
use crate::services::job::{self, JobRow};
use crate::services::verification::{self, ReviewRow, Verdict};
use crate::state::AppState;

pub(crate) fn directory_error_to_status(err: &DirectoryError) -> StatusCode {
    match err {
        DirectoryError::MissingName => StatusCode::BAD_REQUEST,
        DirectoryError::NameTaken(_) => StatusCode::CONFLICT,
        DirectoryError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// SHARED DIRECTORIES (any authenticated user)
// =============================================================================

/// `GET /api/organizations` — needed by role selection and job forms.
pub async fn list_organizations(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<OrganizationRow>>, StatusCode> {
    let rows = directory::list_organizations(&state.pool)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok(Json(rows))
}

/// `GET /api/skills` — needed by job forms and verification submission.
pub async fn list_skills(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Vec<SkillRow>>, StatusCode> {
    let rows = directory::list_skills(&state.pool)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok(Json(rows))
}

// =============================================================================
// ADMIN DIRECTORIES
// =============================================================================

/// `GET /api/admin/talents`
pub async fn list_talents(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<TalentEntry>>, StatusCode> {
    let rows = directory::list_talents(&state.pool)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok(Json(rows))
}

/// `GET /api/admin/hiring-managers`
pub async fn list_hiring_managers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<HiringManagerEntry>>, StatusCode> {
    let rows = directory::list_hiring_managers(&state.pool)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok(Json(rows))
}

/// `GET /api/admin/jobs` — every posting across organizations.
pub async fn list_all_jobs(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<JobRow>>, StatusCode> {
    let rows = job::list_jobs(&state.pool, None)
        .await
        .map_err(|e| job_error_to_status(&e))?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CreateOrganizationBody {
    pub name: String,
}

/// `POST /api/admin/organizations`
pub async fn create_organization(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateOrganizationBody>,
) -> Result<(StatusCode, Json<OrganizationRow>), StatusCode> {
    let row = directory::create_organization(&state.pool, &body.name)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
pub struct CreateSkillBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `POST /api/admin/skills`
pub async fn create_skill(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(body): Json<CreateSkillBody>,
) -> Result<(StatusCode, Json<SkillRow>), StatusCode> {
    let row = directory::create_skill(&state.pool, &body.name, &body.description)
        .await
        .map_err(|e| directory_error_to_status(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

// =============================================================================
// VERIFICATION REVIEW
// =============================================================================

#[derive(Deserialize)]
pub struct ReviewListQuery {
    pub status: Option<String>,
}

/// `GET /api/admin/verifications` — review queue, optionally by status.
pub async fn list_verifications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<ReviewRow>>, StatusCode> {
    let rows = verification::list_for_review(&state.pool, query.status.as_deref())
        .await
        .map_err(|e| verification_error_to_status(&e))?;
    Ok(Json(rows))
}

/// `GET /api/admin/verifications/:id`
pub async fn get_verification(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(verification_id): Path<Uuid>,
) -> Result<Json<ReviewRow>, StatusCode> {
    let row = verification::get_for_review(&state.pool, verification_id)
        .await
        .map_err(|e| verification_error_to_status(&e))?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct VerdictBody {
    /// `approved` or `rejected`.
    pub verdict: String,
}

pub(crate) fn parse_verdict(s: &str) -> Option<Verdict> {
    match s {
        "approved" => Some(Verdict::Approved),
        "rejected" => Some(Verdict::Rejected),
        _ => None,
    }
}

/// `POST /api/admin/verifications/:id/verdict` — approve or reject, once.
pub async fn review_verification(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(verification_id): Path<Uuid>,
    Json(body): Json<VerdictBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let verdict = parse_verdict(&body.verdict).ok_or(StatusCode::BAD_REQUEST)?;
    verification::review(&state.pool, verification_id, verdict)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %verification_id, "verification review rejected");
            verification_error_to_status(&e)
        })?;
    Ok(Json(serde_json::json!({ "status": verdict.as_str() })))
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
