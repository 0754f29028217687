//! Verification routes — talents submit skill-credential requests and list
//! their own; admin review lives under `/api/admin`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::TalentUser;
use crate::services::verification::{self, VerificationError, VerificationRow};
use crate::state::AppState;

pub(crate) fn verification_error_to_status(err: &VerificationError) -> StatusCode {
    match err {
        VerificationError::NotFound(_) | VerificationError::SkillNotFound(_) => StatusCode::NOT_FOUND,
        VerificationError::MissingDocument | VerificationError::BadStatusFilter(_) => StatusCode::BAD_REQUEST,
        VerificationError::NotPending => StatusCode::CONFLICT,
        VerificationError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct SubmitBody {
    pub skill_id: Uuid,
    pub doc_url: String,
}

/// `POST /api/verifications` — request verification of a skill.
pub async fn submit(
    State(state): State<AppState>,
    talent: TalentUser,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<VerificationRow>), StatusCode> {
    let row = verification::submit(&state.pool, talent.talent_id, body.skill_id, &body.doc_url)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, skill_id = %body.skill_id, "verification submission rejected");
            verification_error_to_status(&e)
        })?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
pub struct VerificationListQuery {
    /// `pending`, `approved`, or `rejected`.
    pub status: Option<String>,
}

/// `GET /api/verifications` — the talent's own requests, optionally filtered.
pub async fn list_own(
    State(state): State<AppState>,
    talent: TalentUser,
    Query(query): Query<VerificationListQuery>,
) -> Result<Json<Vec<VerificationRow>>, StatusCode> {
    let rows = verification::list_for_talent(&state.pool, talent.talent_id, query.status.as_deref())
        .await
        .map_err(|e| verification_error_to_status(&e))?;
    Ok(Json(rows))
}

#[cfg(test)]
#[path = "verifications_test.rs"]
mod tests;
