//! Repository for the `visual_searches` table.
//!
//! Status changes go through [`VisualSearchRepo::transition`], a
//! compare-and-set update guarded by the core transition rules, so a
//! session's observed status sequence can never regress even under
//! concurrent writers.

use cura_core::attributes::VisualAttributes;
use cura_core::search_status::{can_transition, STATUS_FAILED};
use cura_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::visual_search::{CreateVisualSearch, VisualSearch};

/// Column list for `visual_searches` queries.
const COLUMNS: &str = "\
    id, user_id, image_url, source_image_id, crop, budget_min, budget_max, \
    status, analysis_data, error_message, created_at, updated_at";

/// Default cap on session listings per user.
const LIST_LIMIT: i64 = 50;

/// Provides query operations for visual search sessions.
pub struct VisualSearchRepo;

impl VisualSearchRepo {
    /// Create a session row in `pending`, returning the inserted row.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateVisualSearch,
    ) -> Result<VisualSearch, sqlx::Error> {
        let query = format!(
            "INSERT INTO visual_searches \
                 (user_id, image_url, source_image_id, crop, budget_min, budget_max) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VisualSearch>(&query)
            .bind(&dto.user_id)
            .bind(&dto.image_url)
            .bind(&dto.source_image_id)
            .bind(dto.crop.map(Json))
            .bind(dto.budget.and_then(|b| b.min))
            .bind(dto.budget.and_then(|b| b.max))
            .fetch_one(pool)
            .await
    }

    /// Find a session by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VisualSearch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visual_searches WHERE id = $1");
        sqlx::query_as::<_, VisualSearch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by id, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: &str,
    ) -> Result<Option<VisualSearch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visual_searches WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, VisualSearch>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<VisualSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visual_searches \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, VisualSearch>(&query)
            .bind(user_id)
            .bind(LIST_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// Store the extracted attributes on a session.
    pub async fn set_analysis(
        pool: &PgPool,
        id: DbId,
        attributes: &VisualAttributes,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE visual_searches \
             SET analysis_data = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(attributes.clone()))
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Advance a session's status with a compare-and-set update.
    ///
    /// Returns `false` without touching the row when the transition is not
    /// a legal forward step, or when the row is no longer in `from`
    /// (a concurrent writer got there first).
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<bool, sqlx::Error> {
        if !can_transition(from, to) {
            tracing::warn!(search_id = id, from, to, "Rejected illegal status transition");
            return Ok(false);
        }
        let result = sqlx::query(
            "UPDATE visual_searches \
             SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail a session from the given state, retaining the cause for
    /// diagnostics. Compare-and-set like [`transition`](Self::transition).
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        from: &str,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        if !can_transition(from, STATUS_FAILED) {
            tracing::warn!(search_id = id, from, "Rejected illegal transition to failed");
            return Ok(false);
        }
        let result = sqlx::query(
            "UPDATE visual_searches \
             SET status = $3, error_message = $4, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(STATUS_FAILED)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
