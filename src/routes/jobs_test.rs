use super::*;
use time::macros::date;

// =============================================================================
// parse_deadline
// =============================================================================

#[test]
fn parse_deadline_accepts_iso_date() {
    assert_eq!(parse_deadline("2030-01-15"), Some(date!(2030 - 01 - 15)));
}

#[test]
fn parse_deadline_rejects_garbage() {
    assert_eq!(parse_deadline("15/01/2030"), None);
    assert_eq!(parse_deadline("soon"), None);
    assert_eq!(parse_deadline(""), None);
}

#[test]
fn parse_deadline_rejects_impossible_date() {
    assert_eq!(parse_deadline("2030-02-30"), None);
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn job_not_found_maps_to_404() {
    assert_eq!(job_error_to_status(&JobError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
}

#[test]
fn job_validation_errors_map_to_400() {
    assert_eq!(job_error_to_status(&JobError::NoSkills), StatusCode::BAD_REQUEST);
    assert_eq!(job_error_to_status(&JobError::NoOpenPositions), StatusCode::BAD_REQUEST);
    assert_eq!(job_error_to_status(&JobError::DeadlinePassed), StatusCode::BAD_REQUEST);
}

#[test]
fn duplicate_application_maps_to_conflict() {
    assert_eq!(
        application_error_to_status(&ApplicationError::AlreadyApplied),
        StatusCode::CONFLICT
    );
}

#[test]
fn closed_deadline_maps_to_unprocessable() {
    assert_eq!(
        application_error_to_status(&ApplicationError::DeadlinePassed),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

// =============================================================================
// bodies
// =============================================================================

#[test]
fn create_job_body_parses() {
    let body: CreateJobBody = serde_json::from_str(
        r#"{
            "title": "Backend Engineer",
            "description": "Build the pipeline",
            "open_positions": 2,
            "location": "Remote",
            "employment_type": "Full-time",
            "salary_range": "$1000 - $2000",
            "application_deadline": "2030-01-15",
            "skills_required": ["00000000-0000-0000-0000-000000000000"]
        }"#,
    )
    .unwrap();
    assert_eq!(body.open_positions, 2);
    assert_eq!(body.skills_required.len(), 1);
}

#[test]
fn apply_body_fields_are_optional() {
    let body: ApplyBody = serde_json::from_str("{}").unwrap();
    assert!(body.resume_url.is_none());
    assert!(body.cover_letter_url.is_none());
}
