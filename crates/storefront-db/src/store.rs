//! # SQLite Cart Store
//!
//! [`CartStore`] over the `cart_lines` table.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every operation is ONE statement, so SQLite's statement atomicity     │
//! │  is the whole concurrency story:                                        │
//! │                                                                         │
//! │  upsert_line  INSERT … ON CONFLICT(product_id) DO UPDATE … RETURNING id │
//! │  set_line     UPDATE … WHERE id = ?                                     │
//! │  replace_line INSERT OR REPLACE … SELECT … WHERE id = ? RETURNING id    │
//! │  remove_line  DELETE … WHERE id = ? RETURNING …                         │
//! │  clear        DELETE FROM cart_lines RETURNING …                        │
//! │                                                                         │
//! │  UNIQUE(product_id) makes a second line for a product impossible.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use storefront_core::validation::validate_quantity;
use storefront_core::{
    CartItem, CartLine, CartStore, CoreResult, ProductCatalog, UpsertedLine, ValidationError,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Cart lines persisted in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteCartStore {
    pool: SqlitePool,
    catalog: Arc<ProductCatalog>,
}

impl SqliteCartStore {
    /// Creates a store over an already migrated pool.
    pub fn new(pool: SqlitePool, catalog: Arc<ProductCatalog>) -> Self {
        SqliteCartStore { pool, catalog }
    }

    /// Merges `delta` into the product's line.
    ///
    /// `None` means the existing quantity plus `delta` would not fit in an
    /// i64; the row is left as it was.
    async fn upsert(&self, product_id: &str, delta: i64) -> DbResult<Option<UpsertedLine>> {
        let new_id = Uuid::new_v4().to_string();

        // SQLite promotes an overflowing integer sum to REAL, so the guard
        // has to run before the addition.
        let returned: Option<String> = sqlx::query_scalar(
            r#"
            INSERT INTO cart_lines (id, product_id, quantity, added_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(product_id) DO UPDATE
                SET quantity = cart_lines.quantity + excluded.quantity
                WHERE cart_lines.quantity <= ?5
            RETURNING id
            "#,
        )
        .bind(&new_id)
        .bind(product_id)
        .bind(delta)
        .bind(Utc::now())
        .bind(i64::MAX - delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(returned.map(|cart_item_id| {
            let merged = cart_item_id != new_id;
            UpsertedLine { cart_item_id, merged }
        }))
    }

    async fn lines(&self) -> DbResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT id AS cart_item_id, product_id, quantity, added_at
            FROM cart_lines
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    async fn drain(&self) -> DbResult<Vec<CartLine>> {
        let mut rows = sqlx::query_as::<_, (i64, String, String, i64, DateTime<Utc>)>(
            "DELETE FROM cart_lines RETURNING seq, id, product_id, quantity, added_at",
        )
        .fetch_all(&self.pool)
        .await?;

        // RETURNING order is unspecified.
        rows.sort_by_key(|row| row.0);

        Ok(rows
            .into_iter()
            .map(|(_, cart_item_id, product_id, quantity, added_at)| CartLine {
                cart_item_id,
                product_id,
                quantity,
                added_at,
            })
            .collect())
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    async fn upsert_line(&self, product_id: &str, quantity_delta: i64) -> CoreResult<UpsertedLine> {
        validate_quantity(quantity_delta)?;

        let line = self
            .upsert(product_id, quantity_delta)
            .await?
            .ok_or_else(|| ValidationError::Overflow {
                field: "quantity".to_string(),
            })?;

        debug!(
            cart_item_id = %line.cart_item_id,
            product_id,
            merged = line.merged,
            "Upserted cart line"
        );
        Ok(line)
    }

    async fn set_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let result = sqlx::query("UPDATE cart_lines SET quantity = ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(cart_item_id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart item", cart_item_id).into());
        }
        Ok(())
    }

    async fn replace_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<UpsertedLine> {
        validate_quantity(quantity)?;

        // REPLACE drops the old row through the product_id conflict; the new
        // row takes the next seq.
        let new_id: Option<String> = sqlx::query_scalar(
            r#"
            INSERT OR REPLACE INTO cart_lines (id, product_id, quantity, added_at)
            SELECT ?1, product_id, ?2, ?3
            FROM cart_lines
            WHERE id = ?4
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(quantity)
        .bind(Utc::now())
        .bind(cart_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        let new_id = new_id.ok_or_else(|| DbError::not_found("Cart item", cart_item_id))?;
        debug!(old_cart_item_id = cart_item_id, cart_item_id = %new_id, "Replaced cart line");
        Ok(UpsertedLine {
            cart_item_id: new_id,
            merged: false,
        })
    }

    async fn remove_line(&self, cart_item_id: &str) -> CoreResult<CartLine> {
        let line = sqlx::query_as::<_, CartLine>(
            r#"
            DELETE FROM cart_lines
            WHERE id = ?1
            RETURNING id AS cart_item_id, product_id, quantity, added_at
            "#,
        )
        .bind(cart_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        line.ok_or_else(|| DbError::not_found("Cart item", cart_item_id).into())
    }

    async fn get_line(&self, cart_item_id: &str) -> CoreResult<Option<CartLine>> {
        let line = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT id AS cart_item_id, product_id, quantity, added_at
            FROM cart_lines
            WHERE id = ?1
            "#,
        )
        .bind(cart_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(line)
    }

    async fn list_lines(&self) -> CoreResult<Vec<CartItem>> {
        let lines = self.lines().await?;
        Ok(self.catalog.snapshot(&lines))
    }

    async fn clear(&self) -> CoreResult<Vec<CartLine>> {
        let drained = self.drain().await?;
        debug!(lines = drained.len(), "Cleared cart");
        Ok(drained)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
