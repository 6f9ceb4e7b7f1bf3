//! Repository for the `search_results` table.
//!
//! Results are written once per session inside a single transaction and
//! are immutable afterwards; the pipeline flips the session to `completed`
//! only after this write commits.

use cura_core::types::DbId;
use sqlx::PgPool;

use crate::models::search_result::{NewSearchResult, SearchResult};

/// Column list for `search_results` queries.
const COLUMNS: &str = "\
    id, search_id, platform, item_url, title, price, currency, image_url, \
    description, similarity_score, match_explanation, created_at";

/// Provides query operations for persisted search results.
pub struct SearchResultRepo;

impl SearchResultRepo {
    /// Insert the accepted result set for a session in one transaction.
    pub async fn insert_batch(
        pool: &PgPool,
        search_id: DbId,
        results: &[NewSearchResult],
    ) -> Result<Vec<SearchResult>, sqlx::Error> {
        let query = format!(
            "INSERT INTO search_results \
                 (search_id, platform, item_url, title, price, currency, \
                  image_url, description, similarity_score, match_explanation) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut saved = Vec::with_capacity(results.len());

        for result in results {
            let row = sqlx::query_as::<_, SearchResult>(&query)
                .bind(search_id)
                .bind(&result.platform)
                .bind(&result.item_url)
                .bind(&result.title)
                .bind(result.price)
                .bind(&result.currency)
                .bind(&result.image_url)
                .bind(&result.description)
                .bind(result.similarity_score)
                .bind(&result.match_explanation)
                .fetch_one(&mut *tx)
                .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// List a session's results, best match first.
    pub async fn list_by_search(
        pool: &PgPool,
        search_id: DbId,
    ) -> Result<Vec<SearchResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM search_results \
             WHERE search_id = $1 \
             ORDER BY similarity_score DESC, id"
        );
        sqlx::query_as::<_, SearchResult>(&query)
            .bind(search_id)
            .fetch_all(pool)
            .await
    }
}
