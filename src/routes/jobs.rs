//! Job routes — postings, details, and the talent-facing application call.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;
use uuid::Uuid;

use crate::routes::auth::{AuthUser, ManagerUser, TalentUser};
use crate::services::application::{self, ApplicationError, ApplicationRow};
use crate::services::job::{self, JobError, JobRow, NewJob};
use crate::services::session::Role;
use crate::state::AppState;

pub(crate) fn job_error_to_status(err: &JobError) -> StatusCode {
    match err {
        JobError::NotFound(_) | JobError::UnknownSkill(_) => StatusCode::NOT_FOUND,
        JobError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub(crate) fn application_error_to_status(err: &ApplicationError) -> StatusCode {
    match err {
        ApplicationError::NotFound(_) | ApplicationError::JobNotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::AlreadyApplied => StatusCode::CONFLICT,
        ApplicationError::DeadlinePassed => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn parse_deadline(s: &str) -> Option<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).ok()
}

#[derive(Deserialize)]
pub struct CreateJobBody {
    pub title: String,
    pub description: String,
    pub open_positions: i32,
    pub location: String,
    pub employment_type: String,
    pub salary_range: String,
    /// `YYYY-MM-DD`.
    pub application_deadline: String,
    pub skills_required: Vec<Uuid>,
}

/// `POST /api/jobs` — create a posting for the manager's organization.
pub async fn create_job(
    State(state): State<AppState>,
    manager: ManagerUser,
    Json(body): Json<CreateJobBody>,
) -> Result<(StatusCode, Json<JobRow>), StatusCode> {
    let deadline = parse_deadline(&body.application_deadline).ok_or(StatusCode::BAD_REQUEST)?;
    let draft = NewJob {
        title: body.title,
        description: body.description,
        open_positions: body.open_positions,
        location: body.location,
        employment_type: body.employment_type,
        salary_range: body.salary_range,
        application_deadline: deadline,
        skills_required: body.skills_required,
    };

    let row = job::create_job(&state.pool, manager.org_id, manager.manager_id, draft)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "job creation rejected");
            job_error_to_status(&e)
        })?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/jobs` — all jobs for talents and admins, own-org for managers.
pub async fn list_jobs(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<JobRow>>, StatusCode> {
    let org_filter = if auth.user.role == Some(Role::HiringManager) {
        let row = sqlx::query_scalar::<_, Uuid>("SELECT org_id FROM hiring_managers WHERE id = $1")
            .bind(auth.user.profile_id)
            .fetch_optional(&state.pool)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        row
    } else {
        None
    };

    let rows = job::list_jobs(&state.pool, org_filter)
        .await
        .map_err(|e| job_error_to_status(&e))?;
    Ok(Json(rows))
}

#[derive(Serialize)]
pub struct SkillRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize)]
pub struct JobDetailsResponse {
    #[serde(flatten)]
    pub job: JobRow,
    pub skills: Vec<SkillRef>,
}

/// `GET /api/jobs/:id` — one job with resolved skill names.
pub async fn get_job(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailsResponse>, StatusCode> {
    let row = job::get_job(&state.pool, job_id)
        .await
        .map_err(|e| job_error_to_status(&e))?;
    let skills = job::resolve_skills(&state.pool, &row.skills_required)
        .await
        .map_err(|e| job_error_to_status(&e))?
        .into_iter()
        .map(|(id, name)| SkillRef { id, name })
        .collect();

    Ok(Json(JobDetailsResponse { job: row, skills }))
}

#[derive(Deserialize)]
pub struct ApplyBody {
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
}

/// `POST /api/jobs/:id/applications` — apply as the current talent.
pub async fn apply(
    State(state): State<AppState>,
    talent: TalentUser,
    Path(job_id): Path<Uuid>,
    Json(body): Json<ApplyBody>,
) -> Result<(StatusCode, Json<ApplicationRow>), StatusCode> {
    let row = application::apply(
        &state.pool,
        job_id,
        talent.talent_id,
        body.resume_url.as_deref(),
        body.cover_letter_url.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::warn!(error = %e, %job_id, "application rejected");
        application_error_to_status(&e)
    })?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
