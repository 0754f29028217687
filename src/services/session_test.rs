use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_round_trips_through_str() {
    for role in [Role::Talent, Role::HiringManager, Role::Admin] {
        assert_eq!(Role::from_str(role.as_str()), Some(role));
    }
}

#[test]
fn role_from_str_rejects_unknown() {
    assert_eq!(Role::from_str("recruiter"), None);
    assert_eq!(Role::from_str(""), None);
}

#[test]
fn role_serializes_snake_case() {
    let json = serde_json::to_string(&Role::HiringManager).unwrap();
    assert_eq!(json, "\"hiring_manager\"");
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serialize_without_role() {
    let user = SessionUser {
        id: Uuid::nil(),
        email: "alice@example.com".into(),
        full_name: "Alice".into(),
        role: None,
        profile_id: None,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["email"], "alice@example.com");
    assert!(json["role"].is_null());
    assert!(json["profile_id"].is_null());
}

#[test]
fn session_user_serialize_with_role() {
    let user = SessionUser {
        id: Uuid::nil(),
        email: "bob@example.com".into(),
        full_name: "Bob".into(),
        role: Some(Role::Talent),
        profile_id: Some(Uuid::nil()),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["role"], "talent");
}
