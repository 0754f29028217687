use super::*;

fn finalist(avg_source: &[i32], hired: bool) -> RankedApplication {
    RankedApplication {
        application_id: Uuid::new_v4(),
        talent_name: "Candidate".into(),
        average_mark: average_mark(avg_source),
        cumulative_marks: avg_source.to_vec(),
        hired,
        hireable: false,
    }
}

// =============================================================================
// pass_rate
// =============================================================================

#[test]
fn pass_rate_zero_when_nothing_decided() {
    assert!((pass_rate(0, 0)).abs() < f64::EPSILON);
}

#[test]
fn pass_rate_all_passed() {
    assert!((pass_rate(4, 0) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn pass_rate_half() {
    assert!((pass_rate(2, 2) - 0.5).abs() < f64::EPSILON);
}

#[test]
fn pass_rate_ignores_ongoing() {
    // Only decided applications count; the signature cannot even see ongoing.
    assert!((pass_rate(1, 3) - 0.25).abs() < f64::EPSILON);
}

// =============================================================================
// average_mark
// =============================================================================

#[test]
fn average_of_empty_is_zero() {
    assert!((average_mark(&[])).abs() < f64::EPSILON);
}

#[test]
fn average_of_single_mark() {
    assert!((average_mark(&[73]) - 73.0).abs() < f64::EPSILON);
}

#[test]
fn average_of_several_marks() {
    assert!((average_mark(&[60, 70, 80]) - 70.0).abs() < f64::EPSILON);
}

#[test]
fn average_is_fractional() {
    assert!((average_mark(&[50, 51]) - 50.5).abs() < f64::EPSILON);
}

// =============================================================================
// rank_finalists
// =============================================================================

#[test]
fn ranks_by_average_descending() {
    let ranked = rank_finalists(
        vec![finalist(&[50], false), finalist(&[90], false), finalist(&[70], false)],
        1,
    );
    assert!((ranked[0].average_mark - 90.0).abs() < f64::EPSILON);
    assert!((ranked[1].average_mark - 70.0).abs() < f64::EPSILON);
    assert!((ranked[2].average_mark - 50.0).abs() < f64::EPSILON);
}

#[test]
fn hireable_window_matches_open_positions() {
    let ranked = rank_finalists(
        vec![finalist(&[90], false), finalist(&[80], false), finalist(&[70], false)],
        2,
    );
    assert!(ranked[0].hireable);
    assert!(ranked[1].hireable);
    assert!(!ranked[2].hireable);
}

#[test]
fn window_larger_than_pool_flags_everyone() {
    let ranked = rank_finalists(vec![finalist(&[90], false), finalist(&[80], false)], 5);
    assert!(ranked.iter().all(|f| f.hireable));
}

#[test]
fn hired_candidates_consume_the_window() {
    // One of two seats is taken; only the top non-hired candidate remains hireable.
    let ranked = rank_finalists(
        vec![finalist(&[90], true), finalist(&[80], false), finalist(&[70], false)],
        2,
    );
    assert!(!ranked[0].hireable, "hired candidate is not re-hireable");
    assert!(ranked[1].hireable);
    assert!(!ranked[2].hireable);
}

#[test]
fn full_window_of_hires_flags_nobody() {
    let ranked = rank_finalists(vec![finalist(&[90], true), finalist(&[80], false)], 1);
    assert!(ranked.iter().all(|f| !f.hireable));
}

#[test]
fn zero_positions_flags_nobody() {
    let ranked = rank_finalists(vec![finalist(&[90], false)], 0);
    assert!(!ranked[0].hireable);
}

#[test]
fn tie_breaks_are_stable_across_calls() {
    let a = finalist(&[80], false);
    let b = finalist(&[80], false);
    let first = rank_finalists(vec![a.clone(), b.clone()], 1);
    let second = rank_finalists(vec![b, a], 1);
    assert_eq!(first[0].application_id, second[0].application_id);
}
