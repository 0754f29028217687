//! Hiring-cycle service — cycles and their ordered steps.
//!
//! DESIGN
//! ======
//! A job has at most one hiring cycle; a cycle has steps ordered by a
//! `sequence_order` that is unique within the cycle. Each step carries three
//! parallel ID lists (in-progress, passed, failed). Creating the cycle's
//! first step admits every pending application for the job into it, in the
//! same transaction as the insert, so an application is never half-admitted.

use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("hiring cycle not found: {0}")]
    NotFound(Uuid),
    #[error("step not found: {0}")]
    StepNotFound(Uuid),
    #[error("job not found: {0}")]
    JobNotFound(Uuid),
    #[error("job already has a hiring cycle")]
    CycleExists,
    #[error("sequence order {0} already used in this cycle")]
    DuplicateSequence(i32),
    #[error("sequence order must be at least 1")]
    BadSequence,
    #[error("min pass mark must be between 0 and 100")]
    BadPassMark,
    #[error("name and description are required")]
    MissingFields,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub description: String,
}

/// Step row with its three parallel application ID lists.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepRow {
    pub id: Uuid,
    pub hiring_cycle_id: Uuid,
    pub sequence_order: i32,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub min_pass_mark: Option<i32>,
    pub applications: Vec<Uuid>,
    pub passed_applications: Vec<Uuid>,
    pub failed_applications: Vec<Uuid>,
}

/// Where an application stands within one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStanding {
    Ongoing,
    Passed,
    Failed,
    /// Not associated with this step at all.
    Unknown,
}

impl StepRow {
    /// Classify an application against this step's three lists.
    #[must_use]
    pub fn standing_of(&self, application_id: Uuid) -> StepStanding {
        if self.passed_applications.contains(&application_id) {
            StepStanding::Passed
        } else if self.failed_applications.contains(&application_id) {
            StepStanding::Failed
        } else if self.applications.contains(&application_id) {
            StepStanding::Ongoing
        } else {
            StepStanding::Unknown
        }
    }
}

pub(crate) fn step_from_row(r: &sqlx::postgres::PgRow) -> StepRow {
    StepRow {
        id: r.get("id"),
        hiring_cycle_id: r.get("hiring_cycle_id"),
        sequence_order: r.get("sequence_order"),
        name: r.get("name"),
        description: r.get("description"),
        url: r.get("url"),
        min_pass_mark: r.get("min_pass_mark"),
        applications: r.get("applications"),
        passed_applications: r.get("passed_applications"),
        failed_applications: r.get("failed_applications"),
    }
}

const STEP_COLUMNS: &str = "id, hiring_cycle_id, sequence_order, name, description, url, \
                            min_pass_mark, applications, passed_applications, failed_applications";

/// Confirm a cycle's job belongs to the given organization. A cycle outside
/// the caller's organization reads as absent.
pub async fn ensure_cycle_org(pool: &PgPool, cycle_id: Uuid, org_id: Uuid) -> Result<(), CycleError> {
    let row = sqlx::query(
        r"SELECT j.org_id
          FROM hiring_cycles c
          JOIN jobs j ON j.id = c.job_id
          WHERE c.id = $1",
    )
    .bind(cycle_id)
    .fetch_optional(pool)
    .await?
    .ok_or(CycleError::NotFound(cycle_id))?;

    let owner: Uuid = row.get("org_id");
    if owner == org_id {
        Ok(())
    } else {
        Err(CycleError::NotFound(cycle_id))
    }
}

/// Same check for a step, resolved through its cycle's job.
pub async fn ensure_step_org(pool: &PgPool, step_id: Uuid, org_id: Uuid) -> Result<(), CycleError> {
    let row = sqlx::query(
        r"SELECT j.org_id
          FROM hiring_cycle_steps s
          JOIN hiring_cycles c ON c.id = s.hiring_cycle_id
          JOIN jobs j ON j.id = c.job_id
          WHERE s.id = $1",
    )
    .bind(step_id)
    .fetch_optional(pool)
    .await?
    .ok_or(CycleError::StepNotFound(step_id))?;

    let owner: Uuid = row.get("org_id");
    if owner == org_id {
        Ok(())
    } else {
        Err(CycleError::StepNotFound(step_id))
    }
}

/// Create the hiring cycle for a job. One cycle per job, and only the job's
/// own organization may open it.
pub async fn create_cycle(
    pool: &PgPool,
    job_id: Uuid,
    manager_id: Uuid,
    org_id: Uuid,
    name: &str,
    description: &str,
) -> Result<CycleRow, CycleError> {
    if name.trim().is_empty() || description.trim().is_empty() {
        return Err(CycleError::MissingFields);
    }

    let job = sqlx::query("SELECT org_id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or(CycleError::JobNotFound(job_id))?;
    let owner: Uuid = job.get("org_id");
    if owner != org_id {
        return Err(CycleError::JobNotFound(job_id));
    }

    let row = sqlx::query(
        r"INSERT INTO hiring_cycles (job_id, created_by, name, description)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (job_id) DO NOTHING
          RETURNING id",
    )
    .bind(job_id)
    .bind(manager_id)
    .bind(name.trim())
    .bind(description.trim())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(CycleError::CycleExists);
    };

    Ok(CycleRow {
        id: row.get("id"),
        job_id,
        name: name.trim().to_owned(),
        description: description.trim().to_owned(),
    })
}

/// List cycles created by a hiring manager, newest first.
pub async fn list_cycles(pool: &PgPool, manager_id: Uuid) -> Result<Vec<CycleRow>, CycleError> {
    let rows = sqlx::query(
        r"SELECT id, job_id, name, description
          FROM hiring_cycles WHERE created_by = $1 ORDER BY created_at DESC",
    )
    .bind(manager_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| CycleRow {
            id: r.get("id"),
            job_id: r.get("job_id"),
            name: r.get("name"),
            description: r.get("description"),
        })
        .collect())
}

/// Fetch one cycle.
pub async fn get_cycle(pool: &PgPool, cycle_id: Uuid) -> Result<CycleRow, CycleError> {
    let row = sqlx::query("SELECT id, job_id, name, description FROM hiring_cycles WHERE id = $1")
        .bind(cycle_id)
        .fetch_optional(pool)
        .await?
        .ok_or(CycleError::NotFound(cycle_id))?;

    Ok(CycleRow {
        id: row.get("id"),
        job_id: row.get("job_id"),
        name: row.get("name"),
        description: row.get("description"),
    })
}

/// Fetch the cycle for a job, if one exists.
pub async fn cycle_for_job(pool: &PgPool, job_id: Uuid) -> Result<Option<CycleRow>, CycleError> {
    let row = sqlx::query("SELECT id, job_id, name, description FROM hiring_cycles WHERE job_id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| CycleRow {
        id: r.get("id"),
        job_id: r.get("job_id"),
        name: r.get("name"),
        description: r.get("description"),
    }))
}

/// Draft of a new step.
#[derive(Debug, Clone)]
pub struct NewStep {
    pub sequence_order: i32,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub min_pass_mark: Option<i32>,
}

pub(crate) fn validate_new_step(draft: &NewStep) -> Result<(), CycleError> {
    if draft.name.trim().is_empty() || draft.description.trim().is_empty() {
        return Err(CycleError::MissingFields);
    }
    if draft.sequence_order < 1 {
        return Err(CycleError::BadSequence);
    }
    if let Some(mark) = draft.min_pass_mark {
        if !(0..=100).contains(&mark) {
            return Err(CycleError::BadPassMark);
        }
    }
    Ok(())
}

/// Add a step to a cycle. The three ID lists start empty; if the new step
/// becomes the cycle's first (lowest sequence order), every pending
/// application for the job is admitted into it atomically.
pub async fn add_step(pool: &PgPool, cycle_id: Uuid, draft: NewStep) -> Result<StepRow, CycleError> {
    validate_new_step(&draft)?;

    let mut tx: Transaction<'_, Postgres> = pool.begin().await?;

    let cycle = sqlx::query("SELECT job_id FROM hiring_cycles WHERE id = $1 FOR UPDATE")
        .bind(cycle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CycleError::NotFound(cycle_id))?;
    let job_id: Uuid = cycle.get("job_id");

    let clash = sqlx::query(
        "SELECT 1 FROM hiring_cycle_steps WHERE hiring_cycle_id = $1 AND sequence_order = $2",
    )
    .bind(cycle_id)
    .bind(draft.sequence_order)
    .fetch_optional(&mut *tx)
    .await?;
    if clash.is_some() {
        return Err(CycleError::DuplicateSequence(draft.sequence_order));
    }

    let lowest: Option<i32> =
        sqlx::query("SELECT min(sequence_order) AS lowest FROM hiring_cycle_steps WHERE hiring_cycle_id = $1")
            .bind(cycle_id)
            .fetch_one(&mut *tx)
            .await?
            .get("lowest");
    let becomes_first = lowest.is_none_or(|low| draft.sequence_order < low);

    let row = sqlx::query(&format!(
        r"INSERT INTO hiring_cycle_steps
              (hiring_cycle_id, sequence_order, name, description, url, min_pass_mark)
          VALUES ($1, $2, $3, $4, $5, $6)
          RETURNING {STEP_COLUMNS}",
    ))
    .bind(cycle_id)
    .bind(draft.sequence_order)
    .bind(draft.name.trim())
    .bind(draft.description.trim())
    .bind(draft.url.as_deref())
    .bind(draft.min_pass_mark)
    .fetch_one(&mut *tx)
    .await?;
    let mut step = step_from_row(&row);

    if becomes_first {
        let pending: Vec<Uuid> = sqlx::query(
            "SELECT id FROM applications WHERE job_id = $1 AND status = 'pending' ORDER BY created_at",
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(|r| r.get("id"))
        .collect();

        if !pending.is_empty() {
            sqlx::query("UPDATE hiring_cycle_steps SET applications = $2 WHERE id = $1")
                .bind(step.id)
                .bind(&pending)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE applications SET status = 'in_progress' WHERE id = ANY($1)")
                .bind(&pending)
                .execute(&mut *tx)
                .await?;
            step.applications = pending;
        }
    }

    tx.commit().await?;
    Ok(step)
}

/// List a cycle's steps ordered by sequence.
pub async fn list_steps(pool: &PgPool, cycle_id: Uuid) -> Result<Vec<StepRow>, CycleError> {
    let rows = sqlx::query(&format!(
        "SELECT {STEP_COLUMNS} FROM hiring_cycle_steps WHERE hiring_cycle_id = $1 ORDER BY sequence_order",
    ))
    .bind(cycle_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(step_from_row).collect())
}

/// Fetch one step.
pub async fn get_step(pool: &PgPool, step_id: Uuid) -> Result<StepRow, CycleError> {
    let row = sqlx::query(&format!("SELECT {STEP_COLUMNS} FROM hiring_cycle_steps WHERE id = $1"))
        .bind(step_id)
        .fetch_optional(pool)
        .await?
        .ok_or(CycleError::StepNotFound(step_id))?;

    Ok(step_from_row(&row))
}

#[cfg(test)]
#[path = "cycle_test.rs"]
mod tests;
