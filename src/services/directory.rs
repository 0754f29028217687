//! Directory service — organizations, skills, and admin listings.

use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("name is required")]
    MissingName,
    #[error("name already exists: {0}")]
    NameTaken(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

/// List organizations alphabetically.
pub async fn list_organizations(pool: &PgPool) -> Result<Vec<OrganizationRow>, DirectoryError> {
    let rows = sqlx::query("SELECT id, name FROM organizations ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .iter()
        .map(|r| OrganizationRow { id: r.get("id"), name: r.get("name") })
        .collect())
}

/// Create an organization with a unique name.
pub async fn create_organization(pool: &PgPool, name: &str) -> Result<OrganizationRow, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::MissingName);
    }

    let row = sqlx::query(
        "INSERT INTO organizations (name) VALUES ($1) ON CONFLICT (name) DO NOTHING RETURNING id",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DirectoryError::NameTaken(name.to_owned()))?;

    Ok(OrganizationRow { id: row.get("id"), name: name.to_owned() })
}

/// List skills alphabetically.
pub async fn list_skills(pool: &PgPool) -> Result<Vec<SkillRow>, DirectoryError> {
    let rows = sqlx::query("SELECT id, name, description FROM skills ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .iter()
        .map(|r| SkillRow { id: r.get("id"), name: r.get("name"), description: r.get("description") })
        .collect())
}

/// Create a skill with a unique name.
pub async fn create_skill(pool: &PgPool, name: &str, description: &str) -> Result<SkillRow, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::MissingName);
    }

    let row = sqlx::query(
        r"INSERT INTO skills (name, description)
          VALUES ($1, $2)
          ON CONFLICT (name) DO NOTHING
          RETURNING id",
    )
    .bind(name)
    .bind(description.trim())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DirectoryError::NameTaken(name.to_owned()))?;

    Ok(SkillRow { id: row.get("id"), name: name.to_owned(), description: description.trim().to_owned() })
}

/// Talent directory entry for admin listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TalentEntry {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub bio: String,
    pub experience: String,
}

/// List all talents with account details.
pub async fn list_talents(pool: &PgPool) -> Result<Vec<TalentEntry>, DirectoryError> {
    let rows = sqlx::query(
        r"SELECT t.id, t.bio, t.experience, u.full_name, u.email
          FROM talents t
          JOIN users u ON u.id = t.user_id
          ORDER BY u.full_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| TalentEntry {
            id: r.get("id"),
            full_name: r.get("full_name"),
            email: r.get("email"),
            bio: r.get("bio"),
            experience: r.get("experience"),
        })
        .collect())
}

/// Hiring-manager directory entry with organization context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HiringManagerEntry {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub title: String,
    pub organization: String,
}

/// List all hiring managers with their organization.
pub async fn list_hiring_managers(pool: &PgPool) -> Result<Vec<HiringManagerEntry>, DirectoryError> {
    let rows = sqlx::query(
        r"SELECT hm.id, hm.title, u.full_name, u.email, o.name AS organization
          FROM hiring_managers hm
          JOIN users u ON u.id = hm.user_id
          JOIN organizations o ON o.id = hm.org_id
          ORDER BY u.full_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| HiringManagerEntry {
            id: r.get("id"),
            full_name: r.get("full_name"),
            email: r.get("email"),
            title: r.get("title"),
            organization: r.get("organization"),
        })
        .collect())
}
