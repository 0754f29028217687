use super::*;
use crate::services::cycle::StepRow;

fn step(ongoing: Vec<Uuid>, min_pass_mark: Option<i32>) -> StepRow {
    StepRow {
        id: Uuid::new_v4(),
        hiring_cycle_id: Uuid::new_v4(),
        sequence_order: 1,
        name: "Interview".into(),
        description: "Technical interview".into(),
        url: None,
        min_pass_mark,
        applications: ongoing,
        passed_applications: vec![],
        failed_applications: vec![],
    }
}

// =============================================================================
// check_mark
// =============================================================================

#[test]
fn mark_in_range_is_recorded() {
    assert_eq!(check_mark(Decision::Pass, Some(70), None).unwrap(), Some(70));
    assert_eq!(check_mark(Decision::Fail, Some(10), None).unwrap(), Some(10));
}

#[test]
fn no_mark_is_fine_without_minimum() {
    assert_eq!(check_mark(Decision::Pass, None, None).unwrap(), None);
    assert_eq!(check_mark(Decision::Fail, None, Some(50)).unwrap(), None);
}

#[test]
fn mark_out_of_range_rejected() {
    assert!(matches!(
        check_mark(Decision::Pass, Some(101), None),
        Err(ProgressError::MarkOutOfRange)
    ));
    assert!(matches!(
        check_mark(Decision::Fail, Some(-5), None),
        Err(ProgressError::MarkOutOfRange)
    ));
}

#[test]
fn pass_with_minimum_requires_mark() {
    assert!(matches!(
        check_mark(Decision::Pass, None, Some(60)),
        Err(ProgressError::MarkRequired)
    ));
}

#[test]
fn pass_below_minimum_rejected() {
    let err = check_mark(Decision::Pass, Some(59), Some(60)).unwrap_err();
    assert!(matches!(err, ProgressError::BelowPassMark { mark: 59, min: 60 }));
}

#[test]
fn pass_at_minimum_allowed() {
    assert_eq!(check_mark(Decision::Pass, Some(60), Some(60)).unwrap(), Some(60));
}

#[test]
fn fail_ignores_minimum() {
    // A failing mark below the bar is still recordable as a fail.
    assert_eq!(check_mark(Decision::Fail, Some(20), Some(60)).unwrap(), Some(20));
}

// =============================================================================
// apply_decision
// =============================================================================

#[test]
fn pass_moves_to_passed_list() {
    let app = Uuid::new_v4();
    let mut s = step(vec![app], None);
    apply_decision(&mut s, app, Decision::Pass).unwrap();
    assert!(s.applications.is_empty());
    assert_eq!(s.passed_applications, vec![app]);
    assert!(s.failed_applications.is_empty());
}

#[test]
fn fail_moves_to_failed_list() {
    let app = Uuid::new_v4();
    let mut s = step(vec![app], None);
    apply_decision(&mut s, app, Decision::Fail).unwrap();
    assert!(s.applications.is_empty());
    assert!(s.passed_applications.is_empty());
    assert_eq!(s.failed_applications, vec![app]);
}

#[test]
fn decision_keeps_other_candidates_in_place() {
    let app = Uuid::new_v4();
    let other = Uuid::new_v4();
    let mut s = step(vec![other, app], None);
    apply_decision(&mut s, app, Decision::Pass).unwrap();
    assert_eq!(s.applications, vec![other]);
}

#[test]
fn decision_on_absent_application_is_rejected() {
    let mut s = step(vec![Uuid::new_v4()], None);
    let err = apply_decision(&mut s, Uuid::new_v4(), Decision::Pass).unwrap_err();
    assert!(matches!(err, ProgressError::NotInStep));
}

#[test]
fn decision_is_not_repeatable() {
    // Once moved out of the in-progress list, a second decision conflicts.
    let app = Uuid::new_v4();
    let mut s = step(vec![app], None);
    apply_decision(&mut s, app, Decision::Pass).unwrap();
    let err = apply_decision(&mut s, app, Decision::Fail).unwrap_err();
    assert!(matches!(err, ProgressError::NotInStep));
}

#[test]
fn application_lands_in_exactly_one_list() {
    let app = Uuid::new_v4();
    let mut s = step(vec![app], None);
    apply_decision(&mut s, app, Decision::Fail).unwrap();
    let memberships = usize::from(s.applications.contains(&app))
        + usize::from(s.passed_applications.contains(&app))
        + usize::from(s.failed_applications.contains(&app));
    assert_eq!(memberships, 1);
}
