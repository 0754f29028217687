use super::*;
use uuid::Uuid;

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn cycle_exists_maps_to_conflict() {
    assert_eq!(cycle_error_to_status(&CycleError::CycleExists), StatusCode::CONFLICT);
    assert_eq!(
        cycle_error_to_status(&CycleError::DuplicateSequence(2)),
        StatusCode::CONFLICT
    );
}

#[test]
fn cycle_lookups_map_to_404() {
    assert_eq!(cycle_error_to_status(&CycleError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(
        cycle_error_to_status(&CycleError::StepNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        cycle_error_to_status(&CycleError::JobNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn cycle_validation_maps_to_400() {
    assert_eq!(cycle_error_to_status(&CycleError::BadSequence), StatusCode::BAD_REQUEST);
    assert_eq!(cycle_error_to_status(&CycleError::BadPassMark), StatusCode::BAD_REQUEST);
    assert_eq!(cycle_error_to_status(&CycleError::MissingFields), StatusCode::BAD_REQUEST);
}

#[test]
fn decision_conflicts_map_to_409() {
    assert_eq!(progress_error_to_status(&ProgressError::NotInStep), StatusCode::CONFLICT);
    assert_eq!(progress_error_to_status(&ProgressError::NotRanked), StatusCode::CONFLICT);
    assert_eq!(progress_error_to_status(&ProgressError::AlreadyHired), StatusCode::CONFLICT);
    assert_eq!(
        progress_error_to_status(&ProgressError::PositionsFilled),
        StatusCode::CONFLICT
    );
}

#[test]
fn mark_errors_map_to_400() {
    assert_eq!(progress_error_to_status(&ProgressError::MarkOutOfRange), StatusCode::BAD_REQUEST);
    assert_eq!(progress_error_to_status(&ProgressError::MarkRequired), StatusCode::BAD_REQUEST);
    assert_eq!(
        progress_error_to_status(&ProgressError::BelowPassMark { mark: 40, min: 60 }),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn empty_cycle_hire_maps_to_unprocessable() {
    assert_eq!(progress_error_to_status(&ProgressError::NoSteps), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn stats_missing_cycle_maps_to_404() {
    assert_eq!(
        stats_error_to_status(&StatsError::CycleNotFound(Uuid::nil())),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// request parsing
// =============================================================================

#[test]
fn parse_decision_accepts_both_verdicts() {
    assert_eq!(parse_decision("pass"), Some(Decision::Pass));
    assert_eq!(parse_decision("fail"), Some(Decision::Fail));
    assert_eq!(parse_decision("maybe"), None);
    assert_eq!(parse_decision("PASS"), None);
}

#[test]
fn parse_standing_filter_covers_three_lists() {
    assert_eq!(parse_standing_filter("ongoing"), Some(StepStanding::Ongoing));
    assert_eq!(parse_standing_filter("passed"), Some(StepStanding::Passed));
    assert_eq!(parse_standing_filter("failed"), Some(StepStanding::Failed));
    assert_eq!(parse_standing_filter("hired"), None);
}

#[test]
fn add_step_body_optional_fields_default() {
    let body: AddStepBody = serde_json::from_str(
        r#"{"sequence_order":1,"name":"Screening","description":"Resume review"}"#,
    )
    .unwrap();
    assert_eq!(body.sequence_order, 1);
    assert!(body.url.is_none());
    assert!(body.min_pass_mark.is_none());
}

// =============================================================================
// assemble_entries
// =============================================================================

fn step_with(ongoing: Vec<Uuid>, passed: Vec<Uuid>, failed: Vec<Uuid>) -> StepRow {
    StepRow {
        id: Uuid::new_v4(),
        hiring_cycle_id: Uuid::new_v4(),
        sequence_order: 1,
        name: "Interview".into(),
        description: "Technical interview".into(),
        url: None,
        min_pass_mark: None,
        applications: ongoing,
        passed_applications: passed,
        failed_applications: failed,
    }
}

fn application(id: Uuid) -> ApplicationRow {
    ApplicationRow {
        id,
        job_id: Uuid::nil(),
        talent_id: Uuid::nil(),
        resume_url: None,
        cover_letter_url: None,
        status: "in_progress".into(),
        cumulative_marks: vec![],
        created_at: String::new(),
    }
}

#[test]
fn entries_pair_each_application_with_its_standing() {
    let ongoing = Uuid::new_v4();
    let passed = Uuid::new_v4();
    let step = step_with(vec![ongoing], vec![passed], vec![]);

    let entries = assemble_entries(&step, vec![application(ongoing), application(passed)], None);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].standing, StepStanding::Ongoing);
    assert_eq!(entries[1].standing, StepStanding::Passed);
}

#[test]
fn dangling_list_id_yields_no_entry() {
    // The step references an application row that no longer exists; the
    // batch fetch returns only the live one and the response stays intact.
    let live = Uuid::new_v4();
    let dangling = Uuid::new_v4();
    let step = step_with(vec![live, dangling], vec![], vec![]);

    let entries = assemble_entries(&step, vec![application(live)], None);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].application.id, live);
}

#[test]
fn standing_filter_narrows_entries() {
    let ongoing = Uuid::new_v4();
    let failed = Uuid::new_v4();
    let step = step_with(vec![ongoing], vec![], vec![failed]);
    let fetched = vec![application(ongoing), application(failed)];

    let entries = assemble_entries(&step, fetched, Some(StepStanding::Failed));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].application.id, failed);
}

#[test]
fn decision_body_parses_mark() {
    let body: DecisionBody = serde_json::from_str(
        r#"{"application_id":"00000000-0000-0000-0000-000000000000","decision":"pass","mark":85}"#,
    )
    .unwrap();
    assert_eq!(body.mark, Some(85));
    assert_eq!(body.decision, "pass");
}
