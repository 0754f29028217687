//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds every API endpoint under a single Axum router. Handlers live in the
//! submodules; business rules live in `crate::services`. Routes are grouped
//! by audience: auth, talent-facing, manager-facing, and admin.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod cycles;
pub mod jobs;
pub mod verifications;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/role", post(auth::select_role))
        // Shared directories
        .route("/api/organizations", get(admin::list_organizations))
        .route("/api/skills", get(admin::list_skills))
        // Jobs
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/{id}", get(jobs::get_job))
        .route("/api/jobs/{id}/applications", post(jobs::apply))
        .route(
            "/api/jobs/{id}/cycle",
            get(cycles::cycle_for_job).post(cycles::create_cycle),
        )
        // Hiring cycles
        .route("/api/cycles", get(cycles::list_cycles))
        .route(
            "/api/cycles/{id}/steps",
            get(cycles::list_steps).post(cycles::add_step),
        )
        .route("/api/cycles/{id}/statistics", get(cycles::statistics))
        .route("/api/cycles/{id}/hire", post(cycles::hire))
        .route("/api/steps/{id}", get(cycles::step_details))
        .route("/api/steps/{id}/decision", post(cycles::record_decision))
        // Talent applications and verifications
        .route("/api/applications", get(applications::list_own))
        .route("/api/applications/{id}/progress", get(applications::progress))
        .route(
            "/api/verifications",
            get(verifications::list_own).post(verifications::submit),
        )
        // Admin
        .route("/api/admin/talents", get(admin::list_talents))
        .route("/api/admin/hiring-managers", get(admin::list_hiring_managers))
        .route("/api/admin/jobs", get(admin::list_all_jobs))
        .route("/api/admin/organizations", post(admin::create_organization))
        .route("/api/admin/skills", post(admin::create_skill))
        .route(
            "/api/admin/verifications",
            get(admin::list_verifications),
        )
        .route("/api/admin/verifications/{id}", get(admin::get_verification))
        .route(
            "/api/admin/verifications/{id}/verdict",
            post(admin::review_verification),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_helpers::test_app_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthz_responds_without_auth() {
        let router = app(test_app_state());
        let response = router
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let router = app(test_app_state());
        let response = router
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_route_rejects_missing_cookie() {
        let router = app(test_app_state());
        let response = router
            .oneshot(Request::builder().uri("/api/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
