//! Application routes — a talent's own applications and their progress.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::routes::auth::TalentUser;
use crate::routes::jobs::application_error_to_status;
use crate::services::application::{self, ApplicationListing, ApplicationProgress};
use crate::state::AppState;

/// `GET /api/applications` — the current talent's applications.
pub async fn list_own(
    State(state): State<AppState>,
    talent: TalentUser,
) -> Result<Json<Vec<ApplicationListing>>, StatusCode> {
    let rows = application::list_for_talent(&state.pool, talent.talent_id)
        .await
        .map_err(|e| application_error_to_status(&e))?;
    Ok(Json(rows))
}

/// `GET /api/applications/:id/progress` — per-step standing for one of the
/// talent's own applications. 404 for anyone else's.
pub async fn progress(
    State(state): State<AppState>,
    talent: TalentUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationProgress>, StatusCode> {
    let view = application::progress(&state.pool, application_id)
        .await
        .map_err(|e| application_error_to_status(&e))?;

    if view.application.talent_id != talent.talent_id {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(view))
}
