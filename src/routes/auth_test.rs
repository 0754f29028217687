use super::*;

// =============================================================================
// env_bool / cookie_secure
// =============================================================================

#[test]
fn env_bool_missing_var_is_none() {
    assert_eq!(env_bool("HIRESWIFT_TEST_UNSET_VAR"), None);
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_is_http_only() {
    let cookie = session_cookie("abc123".into());
    assert_eq!(cookie.name(), "session_token");
    assert_eq!(cookie.value(), "abc123");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
}

#[test]
fn clear_cookie_expires_immediately() {
    let cookie = clear_session_cookie();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

// =============================================================================
// account_error_to_status
// =============================================================================

#[test]
fn bad_credentials_maps_to_unauthorized() {
    assert_eq!(
        account_error_to_status(&AccountError::BadCredentials),
        StatusCode::UNAUTHORIZED
    );
}

#[test]
fn email_taken_maps_to_conflict() {
    assert_eq!(account_error_to_status(&AccountError::EmailTaken), StatusCode::CONFLICT);
    assert_eq!(
        account_error_to_status(&AccountError::RoleAlreadySelected),
        StatusCode::CONFLICT
    );
}

#[test]
fn validation_errors_map_to_bad_request() {
    assert_eq!(account_error_to_status(&AccountError::InvalidEmail), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(&AccountError::WeakPassword), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(&AccountError::MissingName), StatusCode::BAD_REQUEST);
}

#[test]
fn missing_org_maps_to_not_found() {
    assert_eq!(
        account_error_to_status(&AccountError::OrganizationNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        account_error_to_status(&AccountError::UserNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// SelectRoleBody
// =============================================================================

#[test]
fn select_role_body_parses_talent() {
    let body: SelectRoleBody =
        serde_json::from_str(r#"{"role":"talent","bio":"hi","experience":"1-2 years"}"#).unwrap();
    assert_eq!(body.role, "talent");
    assert_eq!(body.bio.as_deref(), Some("hi"));
    assert!(body.org_id.is_none());
}

#[test]
fn select_role_body_parses_hiring_manager() {
    let body: SelectRoleBody = serde_json::from_str(
        r#"{"role":"hiring_manager","org_id":"00000000-0000-0000-0000-000000000000","title":"CTO"}"#,
    )
    .unwrap();
    assert_eq!(body.role, "hiring_manager");
    assert_eq!(body.org_id, Some(Uuid::nil()));
}
