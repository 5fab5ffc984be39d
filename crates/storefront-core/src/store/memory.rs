//! # In-Memory Cart Store
//!
//! ## Thread Safety
//! The lines are wrapped in `Arc<Mutex<T>>` because:
//! 1. Many requests may read or modify the cart at once
//! 2. Only one request may modify the cart at a time
//! 3. The lookup-then-insert in `upsert_line` must not interleave
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  upsert_line() ────────► find by product → qty += n  | lines.push()   │
//! │  set_line() ───────────► lines[i].quantity = n                         │
//! │  replace_line() ───────► lines.remove(i) + lines.push(fresh id)        │
//! │  remove_line() ────────► lines.remove(i)                               │
//! │  clear() ──────────────► mem::take(lines)                              │
//! │  list_lines() ─────────► catalog.snapshot(lines)   (read only)         │
//! │                                                                         │
//! │  NOTE: every operation holds the lock for its whole body.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::store::CartStore;
use crate::types::{CartItem, CartLine, UpsertedLine};
use crate::validation::validate_quantity;

/// Cart lines held in process memory.
///
/// Cloning shares the same lines.
#[derive(Debug, Clone)]
pub struct MemoryCartStore {
    lines: Arc<Mutex<Vec<CartLine>>>,
    catalog: Arc<ProductCatalog>,
}

impl MemoryCartStore {
    /// Creates an empty store that joins against `catalog`.
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        MemoryCartStore {
            lines: Arc::new(Mutex::new(Vec::new())),
            catalog,
        }
    }

    /// Number of distinct lines.
    pub async fn line_count(&self) -> usize {
        self.lines.lock().await.len()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn upsert_line(&self, product_id: &str, quantity_delta: i64) -> CoreResult<UpsertedLine> {
        validate_quantity(quantity_delta)?;

        let mut lines = self.lines.lock().await;

        if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line
                .quantity
                .checked_add(quantity_delta)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "quantity".to_string(),
                })?;
            debug!(cart_item_id = %line.cart_item_id, quantity = line.quantity, "Merged into cart line");
            return Ok(UpsertedLine {
                cart_item_id: line.cart_item_id.clone(),
                merged: true,
            });
        }

        let line = CartLine {
            cart_item_id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            quantity: quantity_delta,
            added_at: Utc::now(),
        };
        debug!(cart_item_id = %line.cart_item_id, product_id, "Created cart line");
        let cart_item_id = line.cart_item_id.clone();
        lines.push(line);

        Ok(UpsertedLine {
            cart_item_id,
            merged: false,
        })
    }

    async fn set_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let mut lines = self.lines.lock().await;
        let line = lines
            .iter_mut()
            .find(|l| l.cart_item_id == cart_item_id)
            .ok_or_else(|| CoreError::not_found("Cart item", cart_item_id))?;
        line.quantity = quantity;
        Ok(())
    }

    async fn replace_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<UpsertedLine> {
        validate_quantity(quantity)?;

        let mut lines = self.lines.lock().await;
        let position = lines
            .iter()
            .position(|l| l.cart_item_id == cart_item_id)
            .ok_or_else(|| CoreError::not_found("Cart item", cart_item_id))?;
        let old = lines.remove(position);

        let line = CartLine {
            cart_item_id: Uuid::new_v4().to_string(),
            product_id: old.product_id,
            quantity,
            added_at: Utc::now(),
        };
        let new_id = line.cart_item_id.clone();
        lines.push(line);

        Ok(UpsertedLine {
            cart_item_id: new_id,
            merged: false,
        })
    }

    async fn remove_line(&self, cart_item_id: &str) -> CoreResult<CartLine> {
        let mut lines = self.lines.lock().await;
        let position = lines
            .iter()
            .position(|l| l.cart_item_id == cart_item_id)
            .ok_or_else(|| CoreError::not_found("Cart item", cart_item_id))?;
        Ok(lines.remove(position))
    }

    async fn get_line(&self, cart_item_id: &str) -> CoreResult<Option<CartLine>> {
        let lines = self.lines.lock().await;
        Ok(lines.iter().find(|l| l.cart_item_id == cart_item_id).cloned())
    }

    async fn list_lines(&self) -> CoreResult<Vec<CartItem>> {
        let lines = self.lines.lock().await;
        Ok(self.catalog.snapshot(&lines))
    }

    async fn clear(&self) -> CoreResult<Vec<CartLine>> {
        let mut lines = self.lines.lock().await;
        Ok(std::mem::take(&mut *lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn store() -> MemoryCartStore {
        MemoryCartStore::new(Arc::new(ProductCatalog::seeded()))
    }

    #[tokio::test]
    async fn test_upsert_creates_then_merges() {
        let store = store();

        let first = store.upsert_line("1", 2).await.unwrap();
        let second = store.upsert_line("1", 3).await.unwrap();

        assert!(!first.merged);
        assert!(second.merged);
        assert_eq!(first.cart_item_id, second.cart_item_id);
        assert_eq!(store.line_count().await, 1);

        let line = store.get_line(&first.cart_item_id).await.unwrap().unwrap();
        assert_eq!(line.quantity, 5);
    }

    #[tokio::test]
    async fn test_upsert_rejects_non_positive_delta() {
        let store = store();
        let err = store.upsert_line("1", 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(store.line_count().await, 0);
    }

    #[tokio::test]
    async fn test_upsert_overflow_keeps_quantity() {
        let store = store();
        let line = store.upsert_line("1", i64::MAX).await.unwrap();

        let err = store.upsert_line("1", 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let kept = store.get_line(&line.cart_item_id).await.unwrap().unwrap();
        assert_eq!(kept.quantity, i64::MAX);
    }

    #[tokio::test]
    async fn test_set_line() {
        let store = store();
        let line = store.upsert_line("2", 1).await.unwrap();

        store.set_line(&line.cart_item_id, 7).await.unwrap();
        let updated = store.get_line(&line.cart_item_id).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 7);

        let err = store.set_line(&line.cart_item_id, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let err = store.set_line("nope", 3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_replace_line_moves_to_end_with_fresh_id() {
        let store = store();
        let first = store.upsert_line("1", 2).await.unwrap();
        store.upsert_line("3", 1).await.unwrap();

        let replaced = store.replace_line(&first.cart_item_id, 5).await.unwrap();
        assert_ne!(replaced.cart_item_id, first.cart_item_id);
        assert!(!replaced.merged);
        assert!(store.get_line(&first.cart_item_id).await.unwrap().is_none());

        let items = store.list_lines().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].cart_item_id, replaced.cart_item_id);
        assert_eq!(items[1].product_id, "1");
        assert_eq!(items[1].quantity, 5);
    }

    #[tokio::test]
    async fn test_replace_line_errors_leave_store_unchanged() {
        let store = store();
        let line = store.upsert_line("2", 3).await.unwrap();

        let err = store.replace_line("nope", 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.replace_line(&line.cart_item_id, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);

        let kept = store.get_line(&line.cart_item_id).await.unwrap().unwrap();
        assert_eq!(kept.quantity, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replace_line_against_concurrent_adds() {
        let store = store();
        let line = store.upsert_line("4", 1).await.unwrap();

        let adds: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.upsert_line("4", 1).await })
            })
            .collect();
        let replaced = store.replace_line(&line.cart_item_id, 10).await.unwrap();

        let mut merged_after = 0;
        for handle in adds {
            let added = handle.await.unwrap().unwrap();
            assert!(added.merged);
            if added.cart_item_id == replaced.cart_item_id {
                merged_after += 1;
            }
        }

        assert_eq!(store.line_count().await, 1);
        let kept = store.get_line(&replaced.cart_item_id).await.unwrap().unwrap();
        assert_eq!(kept.quantity, 10 + merged_after);
    }

    #[tokio::test]
    async fn test_remove_unknown_leaves_store_unchanged() {
        let store = store();
        store.upsert_line("1", 1).await.unwrap();

        let err = store.remove_line("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.line_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_lines_in_insertion_order() {
        let store = store();
        store.upsert_line("3", 1).await.unwrap();
        store.upsert_line("1", 2).await.unwrap();
        store.upsert_line("3", 1).await.unwrap();

        let items = store.list_lines().await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Wireless Headphones"]);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_clear_drains_lines() {
        let store = store();
        store.upsert_line("1", 1).await.unwrap();
        store.upsert_line("4", 2).await.unwrap();

        let drained = store.clear().await.unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(store.line_count().await, 0);
        assert!(store.clear().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_never_duplicate() {
        let store = store();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.upsert_line("5", 1).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().cart_item_id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.line_count().await, 1);
        let line = store.get_line(&ids[0]).await.unwrap().unwrap();
        assert_eq!(line.quantity, 64);
    }
}
