//! Job service — posting CRUD and skill resolution.
//!
//! Option sets for location, employment type, and salary range are fixed
//! vocabularies; a posting outside them is rejected before touching the
//! database.

use sqlx::{PgPool, Row};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub const LOCATIONS: &[&str] = &["In-person", "Hybrid", "Remote"];
pub const EMPLOYMENT_TYPES: &[&str] = &["Apprenticeship", "Internship", "Part-time", "Full-time"];
pub const SALARY_RANGES: &[&str] = &[
    "$100 - $300",
    "$300 - $600",
    "$600 - $1000",
    "$1000 - $2000",
    "$2000+",
];

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    NotFound(Uuid),
    #[error("invalid {field}: {value}")]
    InvalidOption { field: &'static str, value: String },
    #[error("at least one required skill must be selected")]
    NoSkills,
    #[error("unknown skill: {0}")]
    UnknownSkill(Uuid),
    #[error("open positions must be at least 1")]
    NoOpenPositions,
    #[error("application deadline must not be in the past")]
    DeadlinePassed,
    #[error("title and description are required")]
    MissingFields,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Validated draft of a new job posting.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub open_positions: i32,
    pub location: String,
    pub employment_type: String,
    pub salary_range: String,
    pub application_deadline: Date,
    pub skills_required: Vec<Uuid>,
}

/// Job row as stored.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub description: String,
    pub open_positions: i32,
    pub location: String,
    pub employment_type: String,
    pub salary_range: String,
    pub application_deadline: String,
    pub skills_required: Vec<Uuid>,
}

fn row_to_job(r: &sqlx::postgres::PgRow) -> JobRow {
    let deadline: Date = r.get("application_deadline");
    JobRow {
        id: r.get("id"),
        org_id: r.get("org_id"),
        title: r.get("title"),
        description: r.get("description"),
        open_positions: r.get("open_positions"),
        location: r.get("location"),
        employment_type: r.get("employment_type"),
        salary_range: r.get("salary_range"),
        application_deadline: deadline.to_string(),
        skills_required: r.get("skills_required"),
    }
}

/// Validate a draft against the fixed vocabularies and date/count rules.
pub fn validate_new_job(draft: &NewJob, today: Date) -> Result<(), JobError> {
    if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
        return Err(JobError::MissingFields);
    }
    if draft.open_positions < 1 {
        return Err(JobError::NoOpenPositions);
    }
    if draft.skills_required.is_empty() {
        return Err(JobError::NoSkills);
    }
    if !LOCATIONS.contains(&draft.location.as_str()) {
        return Err(JobError::InvalidOption { field: "location", value: draft.location.clone() });
    }
    if !EMPLOYMENT_TYPES.contains(&draft.employment_type.as_str()) {
        return Err(JobError::InvalidOption {
            field: "employment_type",
            value: draft.employment_type.clone(),
        });
    }
    if !SALARY_RANGES.contains(&draft.salary_range.as_str()) {
        return Err(JobError::InvalidOption { field: "salary_range", value: draft.salary_range.clone() });
    }
    if draft.application_deadline < today {
        return Err(JobError::DeadlinePassed);
    }
    Ok(())
}

/// First required skill that the database does not know about.
pub(crate) fn first_missing_skill(required: &[Uuid], known: &[Uuid]) -> Option<Uuid> {
    required.iter().copied().find(|id| !known.contains(id))
}

/// Create a job posting for the given organization and hiring manager.
pub async fn create_job(
    pool: &PgPool,
    org_id: Uuid,
    manager_id: Uuid,
    draft: NewJob,
) -> Result<JobRow, JobError> {
    validate_new_job(&draft, OffsetDateTime::now_utc().date())?;

    let known: Vec<Uuid> = sqlx::query("SELECT id FROM skills WHERE id = ANY($1)")
        .bind(&draft.skills_required)
        .fetch_all(pool)
        .await?
        .iter()
        .map(|r| r.get("id"))
        .collect();
    if let Some(missing) = first_missing_skill(&draft.skills_required, &known) {
        return Err(JobError::UnknownSkill(missing));
    }

    let row = sqlx::query(
        r"INSERT INTO jobs (org_id, created_by, title, description, open_positions,
                            location, employment_type, salary_range, application_deadline,
                            skills_required)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
          RETURNING id, org_id, title, description, open_positions, location,
                    employment_type, salary_range, application_deadline, skills_required",
    )
    .bind(org_id)
    .bind(manager_id)
    .bind(draft.title.trim())
    .bind(draft.description.trim())
    .bind(draft.open_positions)
    .bind(&draft.location)
    .bind(&draft.employment_type)
    .bind(&draft.salary_range)
    .bind(draft.application_deadline)
    .bind(&draft.skills_required)
    .fetch_one(pool)
    .await?;

    Ok(row_to_job(&row))
}

/// List all jobs, newest first. `org_id` narrows to one organization.
pub async fn list_jobs(pool: &PgPool, org_id: Option<Uuid>) -> Result<Vec<JobRow>, JobError> {
    let rows = match org_id {
        Some(org_id) => {
            sqlx::query(
                r"SELECT id, org_id, title, description, open_positions, location,
                         employment_type, salary_range, application_deadline, skills_required
                  FROM jobs WHERE org_id = $1 ORDER BY created_at DESC",
            )
            .bind(org_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r"SELECT id, org_id, title, description, open_positions, location,
                         employment_type, salary_range, application_deadline, skills_required
                  FROM jobs ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(row_to_job).collect())
}

/// Fetch one job.
pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, JobError> {
    let row = sqlx::query(
        r"SELECT id, org_id, title, description, open_positions, location,
                 employment_type, salary_range, application_deadline, skills_required
          FROM jobs WHERE id = $1",
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?
    .ok_or(JobError::NotFound(job_id))?;

    Ok(row_to_job(&row))
}

/// Resolve the names of a job's required skills.
pub async fn resolve_skills(pool: &PgPool, skill_ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, JobError> {
    if skill_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query("SELECT id, name FROM skills WHERE id = ANY($1) ORDER BY name")
        .bind(skill_ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|r| (r.get("id"), r.get("name"))).collect())
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
