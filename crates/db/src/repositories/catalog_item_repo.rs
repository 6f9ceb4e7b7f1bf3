//! Repository for the `catalog_items` table.
//!
//! Writes come from the external ingestion process (bulk upsert keyed on
//! `(platform, external_id)` plus deactivation); the search pipeline only
//! ever reads active rows.

use cura_core::attributes::PriceBudget;
use cura_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::catalog::{CatalogItem, UpsertCatalogItem};

/// Column list for `catalog_items` queries.
const COLUMNS: &str = "\
    id, platform, external_id, title, description, price, currency, \
    item_url, image_url, size_label, condition, attributes, is_active, \
    created_at, updated_at";

/// Provides query operations for marketplace catalog items.
pub struct CatalogItemRepo;

impl CatalogItemRepo {
    /// Bulk upsert ingestion rows in a single transaction, returning the
    /// saved rows. Conflicts on `(platform, external_id)` update the
    /// listing snapshot in place and reactivate it.
    pub async fn upsert_batch(
        pool: &PgPool,
        items: &[UpsertCatalogItem],
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalog_items \
                 (platform, external_id, title, description, price, currency, \
                  item_url, image_url, size_label, condition, attributes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (platform, external_id) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 price = EXCLUDED.price, \
                 currency = EXCLUDED.currency, \
                 item_url = EXCLUDED.item_url, \
                 image_url = EXCLUDED.image_url, \
                 size_label = EXCLUDED.size_label, \
                 condition = EXCLUDED.condition, \
                 attributes = EXCLUDED.attributes, \
                 is_active = TRUE, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut saved = Vec::with_capacity(items.len());

        for item in items {
            let row = sqlx::query_as::<_, CatalogItem>(&query)
                .bind(&item.platform)
                .bind(&item.external_id)
                .bind(&item.title)
                .bind(&item.description)
                .bind(item.price)
                .bind(item.currency.as_deref().unwrap_or("USD"))
                .bind(&item.item_url)
                .bind(&item.image_url)
                .bind(&item.size_label)
                .bind(&item.condition)
                .bind(Json(item.attributes.clone().unwrap_or_default()))
                .fetch_one(&mut *tx)
                .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// List active catalog rows, with the hard budget filter pushed into
    /// SQL when bounds are supplied.
    pub async fn list_active(
        pool: &PgPool,
        budget: Option<&PriceBudget>,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM catalog_items \
             WHERE is_active = TRUE \
               AND ($1::DOUBLE PRECISION IS NULL OR price >= $1) \
               AND ($2::DOUBLE PRECISION IS NULL OR price <= $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(budget.and_then(|b| b.min))
            .bind(budget.and_then(|b| b.max))
            .fetch_all(pool)
            .await
    }

    /// Find a catalog item by its internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CatalogItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items WHERE id = $1");
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a listing (sold/stale). Returns `false` when no row
    /// matched.
    pub async fn deactivate(
        pool: &PgPool,
        platform: &str,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE catalog_items \
             SET is_active = FALSE, updated_at = NOW() \
             WHERE platform = $1 AND external_id = $2",
        )
        .bind(platform)
        .bind(external_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
