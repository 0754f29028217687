//! Application service — applying to jobs and tracking progress.
//!
//! DESIGN
//! ======
//! Applying inserts the application and, when the job's hiring cycle already
//! has steps, admits it into the first step's in-progress list — both inside
//! one transaction. A candidate can hold one application per job.

use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::cycle::{self, CycleError, StepRow, StepStanding};

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application not found: {0}")]
    NotFound(Uuid),
    #[error("job not found: {0}")]
    JobNotFound(Uuid),
    #[error("already applied to this job")]
    AlreadyApplied,
    #[error("application deadline has passed")]
    DeadlinePassed,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<CycleError> for ApplicationError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::Db(e) => Self::Db(e),
            CycleError::JobNotFound(id) => Self::JobNotFound(id),
            // Remaining cycle errors cannot surface from the read paths used here.
            other => Self::Db(sqlx::Error::Protocol(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub talent_id: Uuid,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub status: String,
    pub cumulative_marks: Vec<i32>,
    pub created_at: String,
}

/// Application joined with its job's headline fields for listings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationListing {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub organization: String,
}

fn format_ts(ts: OffsetDateTime) -> String {
    ts.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

fn row_to_application(r: &sqlx::postgres::PgRow) -> ApplicationRow {
    ApplicationRow {
        id: r.get("id"),
        job_id: r.get("job_id"),
        talent_id: r.get("talent_id"),
        resume_url: r.get("resume_url"),
        cover_letter_url: r.get("cover_letter_url"),
        status: r.get("status"),
        cumulative_marks: r.get("cumulative_marks"),
        created_at: format_ts(r.get("created_at")),
    }
}

const APPLICATION_COLUMNS: &str =
    "id, job_id, talent_id, resume_url, cover_letter_url, status, cumulative_marks, created_at";

/// Apply to a job. Admits into the cycle's first step when one exists.
pub async fn apply(
    pool: &PgPool,
    job_id: Uuid,
    talent_id: Uuid,
    resume_url: Option<&str>,
    cover_letter_url: Option<&str>,
) -> Result<ApplicationRow, ApplicationError> {
    let mut tx = pool.begin().await?;

    let job = sqlx::query("SELECT application_deadline >= CURRENT_DATE AS open FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApplicationError::JobNotFound(job_id))?;
    let open: bool = job.get("open");
    if !open {
        return Err(ApplicationError::DeadlinePassed);
    }

    let row = sqlx::query(&format!(
        r"INSERT INTO applications (job_id, talent_id, resume_url, cover_letter_url)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (job_id, talent_id) DO NOTHING
          RETURNING {APPLICATION_COLUMNS}",
    ))
    .bind(job_id)
    .bind(talent_id)
    .bind(resume_url)
    .bind(cover_letter_url)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApplicationError::AlreadyApplied)?;
    let mut application = row_to_application(&row);

    // Admit into the first step, if the job's cycle already has one.
    let first_step = sqlx::query(
        r"SELECT s.id
          FROM hiring_cycle_steps s
          JOIN hiring_cycles c ON c.id = s.hiring_cycle_id
          WHERE c.job_id = $1
          ORDER BY s.sequence_order
          LIMIT 1
          FOR UPDATE OF s",
    )
    .bind(job_id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(step) = first_step {
        let step_id: Uuid = step.get("id");
        sqlx::query("UPDATE hiring_cycle_steps SET applications = array_append(applications, $2) WHERE id = $1")
            .bind(step_id)
            .bind(application.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE applications SET status = 'in_progress' WHERE id = $1")
            .bind(application.id)
            .execute(&mut *tx)
            .await?;
        application.status = "in_progress".into();
    }

    tx.commit().await?;
    Ok(application)
}

/// List a talent's applications newest first, with job headline fields.
pub async fn list_for_talent(pool: &PgPool, talent_id: Uuid) -> Result<Vec<ApplicationListing>, ApplicationError> {
    let rows = sqlx::query(
        r"SELECT a.id, a.job_id, a.talent_id, a.resume_url, a.cover_letter_url,
                 a.status, a.cumulative_marks, a.created_at,
                 j.title AS job_title, o.name AS organization
          FROM applications a
          JOIN jobs j ON j.id = a.job_id
          JOIN organizations o ON o.id = j.org_id
          WHERE a.talent_id = $1
          ORDER BY a.created_at DESC",
    )
    .bind(talent_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| ApplicationListing {
            application: row_to_application(r),
            job_title: r.get("job_title"),
            organization: r.get("organization"),
        })
        .collect())
}

/// Fetch one application.
pub async fn get_application(pool: &PgPool, application_id: Uuid) -> Result<ApplicationRow, ApplicationError> {
    let row = sqlx::query(&format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"))
        .bind(application_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApplicationError::NotFound(application_id))?;

    Ok(row_to_application(&row))
}

/// Fetch a batch of applications in one query, oldest first. IDs with no
/// matching row are skipped.
pub async fn get_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<ApplicationRow>, ApplicationError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ANY($1) ORDER BY created_at",
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_application).collect())
}

/// One entry of the per-step progress trail.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProgressStep {
    #[serde(flatten)]
    pub step: StepRow,
    pub standing: StepStanding,
}

/// Full progress view: the application plus its standing at every step of
/// the job's cycle, in sequence order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApplicationProgress {
    pub application: ApplicationRow,
    pub cycle: Option<cycle::CycleRow>,
    pub steps: Vec<ProgressStep>,
}

/// Assemble the progress trail for an application.
pub async fn progress(pool: &PgPool, application_id: Uuid) -> Result<ApplicationProgress, ApplicationError> {
    let application = get_application(pool, application_id).await?;
    let cycle_row = cycle::cycle_for_job(pool, application.job_id).await?;

    let steps = match &cycle_row {
        Some(c) => cycle::list_steps(pool, c.id).await?,
        None => Vec::new(),
    };

    let steps = steps
        .into_iter()
        .map(|step| {
            let standing = step.standing_of(application_id);
            ProgressStep { step, standing }
        })
        .collect();

    Ok(ApplicationProgress { application, cycle: cycle_row, steps })
}
