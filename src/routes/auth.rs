//! Auth routes — registration, password login, session management, and the
//! role-guard extractors used by the rest of the API.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use sqlx::Row;
use time::Duration;
use uuid::Uuid;

use crate::services::account::{self, AccountError, RoleProfile};
use crate::services::session::{self, Role, SessionUser};
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// EXTRACTORS
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

/// Requires a talent profile. Rejects with 403 otherwise.
pub struct TalentUser {
    pub user: SessionUser,
    pub talent_id: Uuid,
}

impl<S> axum::extract::FromRequestParts<S> for TalentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        match (auth.user.role, auth.user.profile_id) {
            (Some(Role::Talent), Some(talent_id)) => Ok(Self { user: auth.user, talent_id }),
            _ => Err(StatusCode::FORBIDDEN),
        }
    }
}

/// Requires a hiring-manager profile, carrying the manager's organization.
pub struct ManagerUser {
    pub user: SessionUser,
    pub manager_id: Uuid,
    pub org_id: Uuid,
}

impl<S> axum::extract::FromRequestParts<S> for ManagerUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        let (Some(Role::HiringManager), Some(manager_id)) = (auth.user.role, auth.user.profile_id) else {
            return Err(StatusCode::FORBIDDEN);
        };

        let app_state = AppState::from_ref(state);
        let row = sqlx::query("SELECT org_id FROM hiring_managers WHERE id = $1")
            .bind(manager_id)
            .fetch_optional(&app_state.pool)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::FORBIDDEN)?;

        Ok(Self { user: auth.user, manager_id, org_id: row.get("org_id") })
    }
}

/// Requires an admin profile.
pub struct AdminUser {
    pub user: SessionUser,
}

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if auth.user.role == Some(Role::Admin) {
            Ok(Self { user: auth.user })
        } else {
            Err(StatusCode::FORBIDDEN)
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

pub(crate) fn account_error_to_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::InvalidEmail
        | AccountError::WeakPassword
        | AccountError::MissingName
        | AccountError::RoleNotSelectable => StatusCode::BAD_REQUEST,
        AccountError::EmailTaken | AccountError::RoleAlreadySelected => StatusCode::CONFLICT,
        AccountError::BadCredentials => StatusCode::UNAUTHORIZED,
        AccountError::OrganizationNotFound(_) | AccountError::UserNotFound(_) => StatusCode::NOT_FOUND,
        AccountError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// `POST /api/auth/register` — create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(CookieJar, StatusCode), StatusCode> {
    let user_id = account::register(&state.pool, &body.email, &body.password, &body.full_name)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "registration rejected");
            account_error_to_status(&e)
        })?;

    let token = session::create_session(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((CookieJar::new().add(session_cookie(token)), StatusCode::CREATED))
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` — password login, sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, StatusCode), StatusCode> {
    let user_id = account::login(&state.pool, &body.email, &body.password)
        .await
        .map_err(|e| account_error_to_status(&e))?;

    let token = session::create_session(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((CookieJar::new().add(session_cookie(token)), StatusCode::NO_CONTENT))
}

/// `POST /api/auth/logout` — delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let _ = session::delete_session(&state.pool, &auth.token).await;
    (CookieJar::new().add(clear_session_cookie()), StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me` — return current user with resolved role.
pub async fn me(auth: AuthUser) -> Json<SessionUser> {
    Json(auth.user)
}

#[derive(Deserialize)]
pub struct SelectRoleBody {
    pub role: String,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub org_id: Option<Uuid>,
    pub title: Option<String>,
}

/// `POST /api/auth/role` — pick talent or hiring-manager profile, once.
pub async fn select_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SelectRoleBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let profile = match Role::from_str(&body.role) {
        Some(Role::Talent) => RoleProfile::Talent {
            bio: body.bio.unwrap_or_default(),
            experience: body.experience.unwrap_or_default(),
        },
        Some(Role::HiringManager) => {
            let org_id = body.org_id.ok_or(StatusCode::BAD_REQUEST)?;
            RoleProfile::HiringManager { org_id, title: body.title.unwrap_or_default() }
        }
        // Admins are provisioned out of band.
        Some(Role::Admin) | None => return Err(StatusCode::BAD_REQUEST),
    };

    let role = profile.role();
    let profile_id = account::select_role(&state.pool, auth.user.id, profile)
        .await
        .map_err(|e| account_error_to_status(&e))?;

    Ok(Json(serde_json::json!({ "role": role, "profile_id": profile_id })))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
