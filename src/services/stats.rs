//! Statistics service — per-step pass rates and final candidate rankings.
//!
//! Rankings cover the applications that passed the cycle's final step,
//! ordered by average mark. The hireable window is `open_positions` minus
//! seats already taken by hired candidates.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::cycle::{self, CycleError};

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("hiring cycle not found: {0}")]
    CycleNotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<CycleError> for StatsError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::NotFound(id) => Self::CycleNotFound(id),
            CycleError::Db(e) => Self::Db(e),
            other => Self::Db(sqlx::Error::Protocol(other.to_string())),
        }
    }
}

/// Pass/fail tallies for one step.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepStats {
    pub step_id: Uuid,
    pub name: String,
    pub sequence_order: i32,
    pub passed: usize,
    pub failed: usize,
    pub ongoing: usize,
    /// Share of decided applications that passed, 0.0 when nothing decided.
    pub pass_rate: f64,
}

/// Share of decided applications that passed.
#[must_use]
pub(crate) fn pass_rate(passed: usize, failed: usize) -> f64 {
    let decided = passed + failed;
    if decided == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        passed as f64 / decided as f64
    }
}

/// Average of recorded marks, 0.0 when none were recorded.
#[must_use]
pub(crate) fn average_mark(marks: &[i32]) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        f64::from(marks.iter().sum::<i32>()) / marks.len() as f64
    }
}

/// A finalist, ranked by average mark.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RankedApplication {
    pub application_id: Uuid,
    pub talent_name: String,
    pub average_mark: f64,
    pub cumulative_marks: Vec<i32>,
    pub hired: bool,
    /// True when this candidate sits inside the remaining hireable window.
    pub hireable: bool,
}

/// Sort finalists by average mark descending (application ID as a stable
/// tie-break) and flag the hireable window: non-hired candidates, in rank
/// order, until `open_positions` seats are accounted for.
pub(crate) fn rank_finalists(mut finalists: Vec<RankedApplication>, open_positions: i32) -> Vec<RankedApplication> {
    finalists.sort_by(|a, b| {
        b.average_mark
            .partial_cmp(&a.average_mark)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.application_id.cmp(&b.application_id))
    });

    let already_hired = finalists.iter().filter(|f| f.hired).count();
    let mut remaining = usize::try_from(open_positions).unwrap_or(0).saturating_sub(already_hired);
    for finalist in &mut finalists {
        if finalist.hired {
            finalist.hireable = false;
        } else if remaining > 0 {
            finalist.hireable = true;
            remaining -= 1;
        } else {
            finalist.hireable = false;
        }
    }
    finalists
}

/// Full statistics payload for a cycle.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleStatistics {
    pub cycle_id: Uuid,
    pub open_positions: i32,
    pub steps: Vec<StepStats>,
    pub rankings: Vec<RankedApplication>,
}

/// Compute per-step tallies and final rankings for a cycle.
pub async fn cycle_statistics(pool: &PgPool, cycle_id: Uuid) -> Result<CycleStatistics, StatsError> {
    let cycle_row = cycle::get_cycle(pool, cycle_id).await?;
    let steps = cycle::list_steps(pool, cycle_id).await?;

    let open_positions: i32 = sqlx::query("SELECT open_positions FROM jobs WHERE id = $1")
        .bind(cycle_row.job_id)
        .fetch_one(pool)
        .await?
        .get("open_positions");

    let step_stats = steps
        .iter()
        .map(|s| StepStats {
            step_id: s.id,
            name: s.name.clone(),
            sequence_order: s.sequence_order,
            passed: s.passed_applications.len(),
            failed: s.failed_applications.len(),
            ongoing: s.applications.len(),
            pass_rate: pass_rate(s.passed_applications.len(), s.failed_applications.len()),
        })
        .collect();

    let finalist_ids: Vec<Uuid> = steps
        .last()
        .map(|s| s.passed_applications.clone())
        .unwrap_or_default();

    let rankings = if finalist_ids.is_empty() {
        Vec::new()
    } else {
        let rows = sqlx::query(
            r"SELECT a.id, a.cumulative_marks, a.status, u.full_name
              FROM applications a
              JOIN talents t ON t.id = a.talent_id
              JOIN users u ON u.id = t.user_id
              WHERE a.id = ANY($1)",
        )
        .bind(&finalist_ids)
        .fetch_all(pool)
        .await?;

        let finalists = rows
            .iter()
            .map(|r| {
                let marks: Vec<i32> = r.get("cumulative_marks");
                let status: String = r.get("status");
                RankedApplication {
                    application_id: r.get("id"),
                    talent_name: r.get("full_name"),
                    average_mark: average_mark(&marks),
                    cumulative_marks: marks,
                    hired: status == "hired",
                    hireable: false,
                }
            })
            .collect();
        rank_finalists(finalists, open_positions)
    };

    Ok(CycleStatistics { cycle_id, open_positions, steps: step_stats, rankings })
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
