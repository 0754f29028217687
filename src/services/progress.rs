//! Step progression service — pass/fail decisions and hiring.
//!
//! DESIGN
//! ======
//! This is the one place that moves application IDs between a step's three
//! lists. A decision locks the step row (and the next step's, when
//! advancing), mutates the lists in memory, and writes them back inside a
//! single transaction — a candidate can never end up passed in one row but
//! missing from the next step's in-progress list.
//!
//! Hiring locks the job row first, so concurrent hires serialize against
//! `open_positions` and the cap holds under contention.

use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::services::cycle::{StepRow, step_from_row};

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("step not found: {0}")]
    StepNotFound(Uuid),
    #[error("hiring cycle not found: {0}")]
    CycleNotFound(Uuid),
    #[error("application not found: {0}")]
    ApplicationNotFound(Uuid),
    #[error("application is not in progress at this step")]
    NotInStep,
    #[error("mark must be between 0 and 100")]
    MarkOutOfRange,
    #[error("this step requires a mark to pass")]
    MarkRequired,
    #[error("mark {mark} is below the minimum pass mark {min}")]
    BelowPassMark { mark: i32, min: i32 },
    #[error("cycle has no steps")]
    NoSteps,
    #[error("application has not passed the final step")]
    NotRanked,
    #[error("application is already hired")]
    AlreadyHired,
    #[error("all open positions are filled")]
    PositionsFilled,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// A hiring manager's verdict on an application at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Pass,
    Fail,
}

/// Validate an optional mark against the 0..=100 range and the step's
/// minimum, returning the mark to record.
pub(crate) fn check_mark(
    decision: Decision,
    mark: Option<i32>,
    min_pass_mark: Option<i32>,
) -> Result<Option<i32>, ProgressError> {
    if let Some(m) = mark {
        if !(0..=100).contains(&m) {
            return Err(ProgressError::MarkOutOfRange);
        }
    }
    if decision == Decision::Pass {
        if let Some(min) = min_pass_mark {
            let Some(m) = mark else {
                return Err(ProgressError::MarkRequired);
            };
            if m < min {
                return Err(ProgressError::BelowPassMark { mark: m, min });
            }
        }
    }
    Ok(mark)
}

/// Move `application_id` out of the step's in-progress list into the passed
/// or failed list. Pure list surgery; persistence happens in `decide`.
pub(crate) fn apply_decision(step: &mut StepRow, application_id: Uuid, decision: Decision) -> Result<(), ProgressError> {
    let Some(pos) = step.applications.iter().position(|id| *id == application_id) else {
        return Err(ProgressError::NotInStep);
    };
    step.applications.remove(pos);
    match decision {
        Decision::Pass => step.passed_applications.push(application_id),
        Decision::Fail => step.failed_applications.push(application_id),
    }
    Ok(())
}

/// Outcome of a recorded decision.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecisionOutcome {
    pub step: StepRow,
    /// Step the application advanced into, when one exists.
    pub advanced_to: Option<Uuid>,
    /// True when the decision was a pass on the cycle's final step.
    pub cleared_final_step: bool,
}

async fn lock_step(tx: &mut Transaction<'_, Postgres>, step_id: Uuid) -> Result<StepRow, ProgressError> {
    let row = sqlx::query(
        r"SELECT id, hiring_cycle_id, sequence_order, name, description, url,
                 min_pass_mark, applications, passed_applications, failed_applications
          FROM hiring_cycle_steps WHERE id = $1 FOR UPDATE",
    )
    .bind(step_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(ProgressError::StepNotFound(step_id))?;
    Ok(step_from_row(&row))
}

async fn write_step_lists(tx: &mut Transaction<'_, Postgres>, step: &StepRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"UPDATE hiring_cycle_steps
          SET applications = $2, passed_applications = $3, failed_applications = $4
          WHERE id = $1",
    )
    .bind(step.id)
    .bind(&step.applications)
    .bind(&step.passed_applications)
    .bind(&step.failed_applications)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Record a pass/fail decision for an application at a step.
///
/// # Errors
///
/// `NotInStep` when the application is not in the step's in-progress list;
/// mark errors per `check_mark`; `StepNotFound`/`ApplicationNotFound` for
/// dangling IDs.
pub async fn decide(
    pool: &PgPool,
    step_id: Uuid,
    application_id: Uuid,
    decision: Decision,
    mark: Option<i32>,
) -> Result<DecisionOutcome, ProgressError> {
    let mut tx = pool.begin().await?;

    let mut step = lock_step(&mut tx, step_id).await?;
    let mark = check_mark(decision, mark, step.min_pass_mark)?;

    let app = sqlx::query("SELECT id FROM applications WHERE id = $1 FOR UPDATE")
        .bind(application_id)
        .fetch_optional(&mut *tx)
        .await?;
    if app.is_none() {
        return Err(ProgressError::ApplicationNotFound(application_id));
    }

    apply_decision(&mut step, application_id, decision)?;
    write_step_lists(&mut tx, &step).await?;

    if let Some(m) = mark {
        sqlx::query("UPDATE applications SET cumulative_marks = array_append(cumulative_marks, $2) WHERE id = $1")
            .bind(application_id)
            .bind(m)
            .execute(&mut *tx)
            .await?;
    }

    let mut advanced_to = None;
    let mut cleared_final_step = false;
    match decision {
        Decision::Pass => {
            let next = sqlx::query(
                r"SELECT id FROM hiring_cycle_steps
                  WHERE hiring_cycle_id = $1 AND sequence_order > $2
                  ORDER BY sequence_order
                  LIMIT 1
                  FOR UPDATE",
            )
            .bind(step.hiring_cycle_id)
            .bind(step.sequence_order)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(next) = next {
                let next_id: Uuid = next.get("id");
                sqlx::query(
                    "UPDATE hiring_cycle_steps SET applications = array_append(applications, $2) WHERE id = $1",
                )
                .bind(next_id)
                .bind(application_id)
                .execute(&mut *tx)
                .await?;
                advanced_to = Some(next_id);
            } else {
                cleared_final_step = true;
            }
        }
        Decision::Fail => {
            sqlx::query("UPDATE applications SET status = 'rejected' WHERE id = $1")
                .bind(application_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(DecisionOutcome { step, advanced_to, cleared_final_step })
}

/// Hire a candidate who passed the cycle's final step.
///
/// Locks the job row so the number of hired applications can never exceed
/// `open_positions`, however many requests race.
pub async fn hire(pool: &PgPool, cycle_id: Uuid, application_id: Uuid) -> Result<(), ProgressError> {
    let mut tx = pool.begin().await?;

    let cycle = sqlx::query("SELECT job_id FROM hiring_cycles WHERE id = $1")
        .bind(cycle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ProgressError::CycleNotFound(cycle_id))?;
    let job_id: Uuid = cycle.get("job_id");

    let job = sqlx::query("SELECT open_positions FROM jobs WHERE id = $1 FOR UPDATE")
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;
    let open_positions: i32 = job.get("open_positions");

    let final_step = sqlx::query(
        r"SELECT passed_applications FROM hiring_cycle_steps
          WHERE hiring_cycle_id = $1
          ORDER BY sequence_order DESC
          LIMIT 1",
    )
    .bind(cycle_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ProgressError::NoSteps)?;
    let passed: Vec<Uuid> = final_step.get("passed_applications");
    if !passed.contains(&application_id) {
        return Err(ProgressError::NotRanked);
    }

    let app = sqlx::query("SELECT status FROM applications WHERE id = $1 FOR UPDATE")
        .bind(application_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ProgressError::ApplicationNotFound(application_id))?;
    let status: String = app.get("status");
    if status == "hired" {
        return Err(ProgressError::AlreadyHired);
    }

    let hired: i64 = sqlx::query("SELECT count(*) AS n FROM applications WHERE job_id = $1 AND status = 'hired'")
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?
        .get("n");
    if hired >= i64::from(open_positions) {
        return Err(ProgressError::PositionsFilled);
    }

    sqlx::query("UPDATE applications SET status = 'hired' WHERE id = $1")
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(%job_id, %application_id, "candidate hired");
    Ok(())
}

#[cfg(test)]
#[path = "progress_test.rs"]
mod tests;
