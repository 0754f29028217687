//! Hiring-cycle routes — cycles, steps, decisions, statistics, and hiring.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::auth::{AuthUser, ManagerUser};
use crate::services::application::{self, ApplicationRow};
use crate::services::cycle::{self, CycleError, CycleRow, NewStep, StepRow, StepStanding};
use crate::services::progress::{self, Decision, DecisionOutcome, ProgressError};
use crate::services::stats::{self, CycleStatistics, StatsError};
use crate::state::AppState;

pub(crate) fn cycle_error_to_status(err: &CycleError) -> StatusCode {
    match err {
        CycleError::NotFound(_) | CycleError::StepNotFound(_) | CycleError::JobNotFound(_) => StatusCode::NOT_FOUND,
        CycleError::CycleExists | CycleError::DuplicateSequence(_) => StatusCode::CONFLICT,
        CycleError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub(crate) fn progress_error_to_status(err: &ProgressError) -> StatusCode {
    match err {
        ProgressError::StepNotFound(_)
        | ProgressError::CycleNotFound(_)
        | ProgressError::ApplicationNotFound(_) => StatusCode::NOT_FOUND,
        ProgressError::NotInStep
        | ProgressError::NotRanked
        | ProgressError::AlreadyHired
        | ProgressError::PositionsFilled => StatusCode::CONFLICT,
        ProgressError::MarkOutOfRange | ProgressError::MarkRequired | ProgressError::BelowPassMark { .. } => {
            StatusCode::BAD_REQUEST
        }
        ProgressError::NoSteps => StatusCode::UNPROCESSABLE_ENTITY,
        ProgressError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn stats_error_to_status(err: &StatsError) -> StatusCode {
    match err {
        StatsError::CycleNotFound(_) => StatusCode::NOT_FOUND,
        StatsError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct CreateCycleBody {
    pub name: String,
    pub description: String,
}

/// `POST /api/jobs/:id/cycle` — create the job's hiring cycle.
pub async fn create_cycle(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateCycleBody>,
) -> Result<(StatusCode, Json<CycleRow>), StatusCode> {
    let row = cycle::create_cycle(
        &state.pool,
        job_id,
        manager.manager_id,
        manager.org_id,
        &body.name,
        &body.description,
    )
    .await
    .map_err(|e| {
        tracing::warn!(error = %e, %job_id, "cycle creation rejected");
        cycle_error_to_status(&e)
    })?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/jobs/:id/cycle` — the job's cycle, if any.
pub async fn cycle_for_job(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CycleRow>, StatusCode> {
    let row = cycle::cycle_for_job(&state.pool, job_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(row))
}

/// `GET /api/cycles` — cycles created by the current manager.
pub async fn list_cycles(State(state): State<AppState>, manager: ManagerUser) -> Result<Json<Vec<CycleRow>>, StatusCode> {
    let rows = cycle::list_cycles(&state.pool, manager.manager_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct AddStepBody {
    pub sequence_order: i32,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub min_pass_mark: Option<i32>,
}

/// `POST /api/cycles/:id/steps` — add a step to one of the caller's own
/// organization's cycles.
pub async fn add_step(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(cycle_id): Path<Uuid>,
    Json(body): Json<AddStepBody>,
) -> Result<(StatusCode, Json<StepRow>), StatusCode> {
    cycle::ensure_cycle_org(&state.pool, cycle_id, manager.org_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;

    let draft = NewStep {
        sequence_order: body.sequence_order,
        name: body.name,
        description: body.description,
        url: body.url,
        min_pass_mark: body.min_pass_mark,
    };
    let row = cycle::add_step(&state.pool, cycle_id, draft)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %cycle_id, "step creation rejected");
            cycle_error_to_status(&e)
        })?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/cycles/:id/steps` — steps in sequence order.
pub async fn list_steps(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(cycle_id): Path<Uuid>,
) -> Result<Json<Vec<StepRow>>, StatusCode> {
    let rows = cycle::list_steps(&state.pool, cycle_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct StepDetailsQuery {
    /// `ongoing`, `passed`, or `failed`; absent means everyone.
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct StepApplicationEntry {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub standing: StepStanding,
}

#[derive(Serialize)]
pub struct StepDetailsResponse {
    #[serde(flatten)]
    pub step: StepRow,
    pub entries: Vec<StepApplicationEntry>,
}

pub(crate) fn parse_standing_filter(s: &str) -> Option<StepStanding> {
    match s {
        "ongoing" => Some(StepStanding::Ongoing),
        "passed" => Some(StepStanding::Passed),
        "failed" => Some(StepStanding::Failed),
        _ => None,
    }
}

/// `GET /api/steps/:id` — step details with every associated application
/// classified against the step's three lists.
pub async fn step_details(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(step_id): Path<Uuid>,
    Query(query): Query<StepDetailsQuery>,
) -> Result<Json<StepDetailsResponse>, StatusCode> {
    let filter = match query.status.as_deref() {
        Some(raw) => Some(parse_standing_filter(raw).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };

    cycle::ensure_step_org(&state.pool, step_id, manager.org_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;

    let step = cycle::get_step(&state.pool, step_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;

    let mut ids: Vec<Uuid> = Vec::new();
    ids.extend(&step.applications);
    ids.extend(&step.passed_applications);
    ids.extend(&step.failed_applications);

    let applications = application::get_many(&state.pool, &ids)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let entries = assemble_entries(&step, applications, filter);
    Ok(Json(StepDetailsResponse { step, entries }))
}

/// Pair each fetched application with its standing in the step, applying the
/// optional filter. An ID left dangling in a step list simply yields no
/// entry.
pub(crate) fn assemble_entries(
    step: &StepRow,
    applications: Vec<ApplicationRow>,
    filter: Option<StepStanding>,
) -> Vec<StepApplicationEntry> {
    applications
        .into_iter()
        .filter_map(|application| {
            let standing = step.standing_of(application.id);
            if filter.is_none() || filter == Some(standing) {
                Some(StepApplicationEntry { application, standing })
            } else {
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
pub struct DecisionBody {
    pub application_id: Uuid,
    /// `pass` or `fail`.
    pub decision: String,
    pub mark: Option<i32>,
}

pub(crate) fn parse_decision(s: &str) -> Option<Decision> {
    match s {
        "pass" => Some(Decision::Pass),
        "fail" => Some(Decision::Fail),
        _ => None,
    }
}

/// `POST /api/steps/:id/decision` — record a pass/fail verdict.
pub async fn record_decision(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(step_id): Path<Uuid>,
    Json(body): Json<DecisionBody>,
) -> Result<Json<DecisionOutcome>, StatusCode> {
    let decision = parse_decision(&body.decision).ok_or(StatusCode::BAD_REQUEST)?;
    cycle::ensure_step_org(&state.pool, step_id, manager.org_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;
    let outcome = progress::decide(&state.pool, step_id, body.application_id, decision, body.mark)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %step_id, application_id = %body.application_id, "decision rejected");
            progress_error_to_status(&e)
        })?;
    Ok(Json(outcome))
}

/// `GET /api/cycles/:id/statistics` — per-step tallies and final rankings.
pub async fn statistics(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(cycle_id): Path<Uuid>,
) -> Result<Json<CycleStatistics>, StatusCode> {
    cycle::ensure_cycle_org(&state.pool, cycle_id, manager.org_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;

    let payload = stats::cycle_statistics(&state.pool, cycle_id)
        .await
        .map_err(|e| stats_error_to_status(&e))?;
    Ok(Json(payload))
}

#[derive(Deserialize)]
pub struct HireBody {
    pub application_id: Uuid,
}

/// `POST /api/cycles/:id/hire` — hire a ranked finalist.
pub async fn hire(
    State(state): State<AppState>,
    manager: ManagerUser,
    Path(cycle_id): Path<Uuid>,
    Json(body): Json<HireBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    cycle::ensure_cycle_org(&state.pool, cycle_id, manager.org_id)
        .await
        .map_err(|e| cycle_error_to_status(&e))?;

    progress::hire(&state.pool, cycle_id, body.application_id)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %cycle_id, application_id = %body.application_id, "hire rejected");
            progress_error_to_status(&e)
        })?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "cycles_test.rs"]
mod tests;
