//! Verification service — skill-credential requests and admin review.
//!
//! A verification starts `pending` and moves exactly once, to `approved` or
//! `rejected`. Review uses a conditional update so two admins racing on the
//! same request cannot both win.

use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("verification not found: {0}")]
    NotFound(Uuid),
    #[error("skill not found: {0}")]
    SkillNotFound(Uuid),
    #[error("document url is required")]
    MissingDocument,
    #[error("unknown status filter: {0}")]
    BadStatusFilter(String),
    #[error("verification is not pending")]
    NotPending,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Review verdict on a pending verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

pub(crate) const STATUS_FILTERS: &[&str] = &["pending", "approved", "rejected"];

pub(crate) fn validate_status_filter(filter: &str) -> Result<(), VerificationError> {
    if STATUS_FILTERS.contains(&filter) {
        Ok(())
    } else {
        Err(VerificationError::BadStatusFilter(filter.to_owned()))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerificationRow {
    pub id: Uuid,
    pub talent_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub doc_url: String,
    pub status: String,
    pub created_at: String,
}

fn format_ts(ts: OffsetDateTime) -> String {
    ts.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

fn row_to_verification(r: &sqlx::postgres::PgRow) -> VerificationRow {
    VerificationRow {
        id: r.get("id"),
        talent_id: r.get("talent_id"),
        skill_id: r.get("skill_id"),
        skill_name: r.get("skill_name"),
        doc_url: r.get("doc_url"),
        status: r.get("status"),
        created_at: format_ts(r.get("created_at")),
    }
}

/// Submit a verification request for a skill. Starts `pending`.
pub async fn submit(
    pool: &PgPool,
    talent_id: Uuid,
    skill_id: Uuid,
    doc_url: &str,
) -> Result<VerificationRow, VerificationError> {
    if doc_url.trim().is_empty() {
        return Err(VerificationError::MissingDocument);
    }

    let skill = sqlx::query("SELECT name FROM skills WHERE id = $1")
        .bind(skill_id)
        .fetch_optional(pool)
        .await?
        .ok_or(VerificationError::SkillNotFound(skill_id))?;
    let skill_name: String = skill.get("name");

    let row = sqlx::query(
        r"INSERT INTO verifications (talent_id, skill_id, doc_url)
          VALUES ($1, $2, $3)
          RETURNING id, talent_id, skill_id, doc_url, status, created_at",
    )
    .bind(talent_id)
    .bind(skill_id)
    .bind(doc_url.trim())
    .fetch_one(pool)
    .await?;

    Ok(VerificationRow {
        id: row.get("id"),
        talent_id: row.get("talent_id"),
        skill_id: row.get("skill_id"),
        skill_name,
        doc_url: row.get("doc_url"),
        status: row.get("status"),
        created_at: format_ts(row.get("created_at")),
    })
}

/// List a talent's verifications newest first, optionally by status.
pub async fn list_for_talent(
    pool: &PgPool,
    talent_id: Uuid,
    status: Option<&str>,
) -> Result<Vec<VerificationRow>, VerificationError> {
    if let Some(filter) = status {
        validate_status_filter(filter)?;
    }

    let rows = sqlx::query(
        r"SELECT v.id, v.talent_id, v.skill_id, v.doc_url, v.status, v.created_at,
                 s.name AS skill_name
          FROM verifications v
          JOIN skills s ON s.id = v.skill_id
          WHERE v.talent_id = $1 AND ($2::text IS NULL OR v.status = $2)
          ORDER BY v.created_at DESC",
    )
    .bind(talent_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_verification).collect())
}

/// Admin review listing: every verification with talent and skill context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReviewRow {
    #[serde(flatten)]
    pub verification: VerificationRow,
    pub talent_name: String,
    pub skill_description: String,
}

/// List all verifications for admin review, newest first.
pub async fn list_for_review(pool: &PgPool, status: Option<&str>) -> Result<Vec<ReviewRow>, VerificationError> {
    if let Some(filter) = status {
        validate_status_filter(filter)?;
    }

    let rows = sqlx::query(
        r"SELECT v.id, v.talent_id, v.skill_id, v.doc_url, v.status, v.created_at,
                 s.name AS skill_name, s.description AS skill_description,
                 u.full_name AS talent_name
          FROM verifications v
          JOIN skills s ON s.id = v.skill_id
          JOIN talents t ON t.id = v.talent_id
          JOIN users u ON u.id = t.user_id
          WHERE $1::text IS NULL OR v.status = $1
          ORDER BY v.created_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| ReviewRow {
            verification: row_to_verification(r),
            talent_name: r.get("talent_name"),
            skill_description: r.get("skill_description"),
        })
        .collect())
}

/// Fetch one verification with review context.
pub async fn get_for_review(pool: &PgPool, verification_id: Uuid) -> Result<ReviewRow, VerificationError> {
    let row = sqlx::query(
        r"SELECT v.id, v.talent_id, v.skill_id, v.doc_url, v.status, v.created_at,
                 s.name AS skill_name, s.description AS skill_description,
                 u.full_name AS talent_name
          FROM verifications v
          JOIN skills s ON s.id = v.skill_id
          JOIN talents t ON t.id = v.talent_id
          JOIN users u ON u.id = t.user_id
          WHERE v.id = $1",
    )
    .bind(verification_id)
    .fetch_optional(pool)
    .await?
    .ok_or(VerificationError::NotFound(verification_id))?;

    Ok(ReviewRow {
        verification: row_to_verification(&row),
        talent_name: row.get("talent_name"),
        skill_description: row.get("skill_description"),
    })
}

/// Record an admin's verdict. Only a `pending` verification can move.
pub async fn review(pool: &PgPool, verification_id: Uuid, verdict: Verdict) -> Result<(), VerificationError> {
    let updated = sqlx::query("UPDATE verifications SET status = $2 WHERE id = $1 AND status = 'pending'")
        .bind(verification_id)
        .bind(verdict.as_str())
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM verifications WHERE id = $1")
            .bind(verification_id)
            .fetch_optional(pool)
            .await?;
        return Err(if exists.is_some() {
            VerificationError::NotPending
        } else {
            VerificationError::NotFound(verification_id)
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_as_str() {
        assert_eq!(Verdict::Approved.as_str(), "approved");
        assert_eq!(Verdict::Rejected.as_str(), "rejected");
    }

    #[test]
    fn status_filter_accepts_known_values() {
        for s in STATUS_FILTERS {
            assert!(validate_status_filter(s).is_ok());
        }
    }

    #[test]
    fn status_filter_rejects_unknown() {
        let err = validate_status_filter("all").unwrap_err();
        assert!(matches!(err, VerificationError::BadStatusFilter(v) if v == "all"));
    }

    #[test]
    fn review_row_flattens_verification() {
        let row = ReviewRow {
            verification: VerificationRow {
                id: Uuid::nil(),
                talent_id: Uuid::nil(),
                skill_id: Uuid::nil(),
                skill_name: "Rust".into(),
                doc_url: "https://example.com/cert".into(),
                status: "pending".into(),
                created_at: String::new(),
            },
            talent_name: "Alice".into(),
            skill_description: "Systems programming".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["skill_name"], "Rust");
        assert_eq!(json["talent_name"], "Alice");
        assert_eq!(json["status"], "pending");
    }
}
