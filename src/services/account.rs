//! Account service — registration, password login, role selection.
//!
//! DESIGN
//! ======
//! Passwords are stored as `salt$hash` where hash = SHA-256(salt || password)
//! over a random 16-byte hex salt. Role selection creates exactly one profile
//! row (talent or hiring manager); admins are provisioned directly in the
//! database and can never be self-selected.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::services::session::{Role, bytes_to_hex};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("full name is required")]
    MissingName,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    BadCredentials,
    #[error("user already has a role profile")]
    RoleAlreadySelected,
    #[error("role cannot be self-selected")]
    RoleNotSelectable,
    #[error("organization not found: {0}")]
    OrganizationNotFound(Uuid),
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    bytes_to_hex(&hasher.finalize())
}

/// Hash a password with a fresh random salt, producing `salt$hash`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = bytes_to_hex(&salt_bytes);
    let hash = sha256_hex(format!("{salt}{password}").as_bytes());
    format!("{salt}${hash}")
}

/// Verify a password against a stored `salt$hash` value.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    sha256_hex(format!("{salt}{password}").as_bytes()) == hash
}

/// Register a new user. Returns the user's UUID.
pub async fn register(
    pool: &PgPool,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<Uuid, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AccountError::WeakPassword);
    }
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AccountError::MissingName);
    }

    let row = sqlx::query(
        r"INSERT INTO users (email, password_hash, full_name)
          VALUES ($1, $2, $3)
          ON CONFLICT (email) DO NOTHING
          RETURNING id",
    )
    .bind(&email)
    .bind(hash_password(password))
    .bind(full_name)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.get("id")).ok_or(AccountError::EmailTaken)
}

/// Check email/password and return the user's UUID on success.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::BadCredentials)?;
    let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Err(AccountError::BadCredentials);
    };
    let stored: String = row.get("password_hash");
    if !verify_password(password, &stored) {
        return Err(AccountError::BadCredentials);
    }
    Ok(row.get("id"))
}

/// Role-specific profile details supplied at selection time.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Talent { bio: String, experience: String },
    HiringManager { org_id: Uuid, title: String },
}

impl RoleProfile {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Talent { .. } => Role::Talent,
            Self::HiringManager { .. } => Role::HiringManager,
        }
    }
}

async fn has_any_profile(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT EXISTS (
              SELECT 1 FROM talents WHERE user_id = $1
              UNION ALL
              SELECT 1 FROM hiring_managers WHERE user_id = $1
              UNION ALL
              SELECT 1 FROM admins WHERE user_id = $1
          ) AS has_profile",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row.get("has_profile"))
}

/// Create the user's role profile. A user may hold at most one: the user row
/// is locked for the duration of the check-and-insert, so two concurrent
/// selections serialize and the loser sees `RoleAlreadySelected`.
/// Returns the new profile row ID.
pub async fn select_role(pool: &PgPool, user_id: Uuid, profile: RoleProfile) -> Result<Uuid, AccountError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AccountError::UserNotFound(user_id))?;

    if has_any_profile(&mut tx, user_id).await? {
        return Err(AccountError::RoleAlreadySelected);
    }

    let row = match profile {
        RoleProfile::Talent { bio, experience } => {
            sqlx::query("INSERT INTO talents (user_id, bio, experience) VALUES ($1, $2, $3) RETURNING id")
                .bind(user_id)
                .bind(bio)
                .bind(experience)
                .fetch_one(&mut *tx)
                .await?
        }
        RoleProfile::HiringManager { org_id, title } => {
            let exists = sqlx::query("SELECT 1 FROM organizations WHERE id = $1")
                .bind(org_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(AccountError::OrganizationNotFound(org_id));
            }
            sqlx::query("INSERT INTO hiring_managers (user_id, org_id, title) VALUES ($1, $2, $3) RETURNING id")
                .bind(user_id)
                .bind(org_id)
                .bind(title)
                .fetch_one(&mut *tx)
                .await?
        }
    };

    let profile_id: Uuid = row.get("id");
    tx.commit().await?;
    Ok(profile_id)
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
