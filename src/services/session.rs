//! Session token management and role resolution.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived opaque session tokens stored server-side; the
//! token is the primary key, so logout is a single delete and validation is
//! one join. Role resolution happens at validation time because a user may
//! pick a role profile after their first login.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Role a user acts under, resolved from the profile tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Talent,
    HiringManager,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Talent => "talent",
            Self::HiringManager => "hiring_manager",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "talent" => Some(Self::Talent),
            "hiring_manager" => Some(Self::HiringManager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// User row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// Resolved role, `None` until the user picks one.
    pub role: Option<Role>,
    /// Profile row ID for the resolved role (talent/hiring manager/admin ID).
    pub profile_id: Option<Uuid>,
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user with their role.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT
              u.id,
              u.email,
              u.full_name,
              a.id AS admin_id,
              t.id AS talent_id,
              hm.id AS hiring_manager_id
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          LEFT JOIN admins a ON a.user_id = u.id
          LEFT JOIN talents t ON t.user_id = u.id
          LEFT JOIN hiring_managers hm ON hm.user_id = u.id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        let admin_id: Option<Uuid> = r.get("admin_id");
        let talent_id: Option<Uuid> = r.get("talent_id");
        let hiring_manager_id: Option<Uuid> = r.get("hiring_manager_id");
        // Admins are provisioned directly in the database and may coexist
        // with an app-selected profile; admin takes precedence.
        let (role, profile_id) = if let Some(id) = admin_id {
            (Some(Role::Admin), Some(id))
        } else if let Some(id) = hiring_manager_id {
            (Some(Role::HiringManager), Some(id))
        } else if let Some(id) = talent_id {
            (Some(Role::Talent), Some(id))
        } else {
            (None, None)
        };

        SessionUser {
            id: r.get("id"),
            email: r.get("email"),
            full_name: r.get("full_name"),
            role,
            profile_id,
        }
    }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
