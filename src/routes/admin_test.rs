use super::*;

#[test]
fn duplicate_name_maps_to_conflict() {
    assert_eq!(
        directory_error_to_status(&DirectoryError::NameTaken("Acme".into())),
        StatusCode::CONFLICT
    );
}

#[test]
fn missing_name_maps_to_400() {
    assert_eq!(directory_error_to_status(&DirectoryError::MissingName), StatusCode::BAD_REQUEST);
}

#[test]
fn parse_verdict_accepts_final_statuses_only() {
    assert_eq!(parse_verdict("approved"), Some(Verdict::Approved));
    assert_eq!(parse_verdict("rejected"), Some(Verdict::Rejected));
    assert_eq!(parse_verdict("pending"), None);
    assert_eq!(parse_verdict(""), None);
}

#[test]
fn create_skill_body_defaults_description() {
    let body: CreateSkillBody = serde_json::from_str(r#"{"name":"Rust"}"#).unwrap();
    assert_eq!(body.name, "Rust");
    assert_eq!(body.description, "");
}
