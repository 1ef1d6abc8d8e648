//! PostgreSQL implementation of the record store.
//!
//! Read-only access to the `products` table with connection pooling and
//! keyset pagination. The synchronizer never mutates this table; upstream
//! CRUD services own it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use catalog_sync_shared::ProductRecord;

use crate::errors::RecordStoreError;
use crate::interfaces::RecordStore;

/// Row shape of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    quantity: i64,
    category_id: i64,
    brand: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        ProductRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
            category_id: row.category_id,
            brand: row.brand,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed product store.
///
/// Uses keyset pagination (`id > $after ORDER BY id`) rather than
/// OFFSET/LIMIT so a full scan stays stable and bounded regardless of table
/// size.
pub struct PostgresProductStore {
    pool: sqlx::PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgreSQL product store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the `products`
    ///   table present
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PostgresProductStore {
    async fn fetch_page(
        &self,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, RecordStoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, price, quantity, category_id, brand, updated_at \
             FROM products \
             WHERE id > $1 \
             ORDER BY id \
             LIMIT $2",
        )
        .bind(after_id.unwrap_or(i64::MIN))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn fetch_modified_since(
        &self,
        since: DateTime<Utc>,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, RecordStoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, price, quantity, category_id, brand, updated_at \
             FROM products \
             WHERE updated_at >= $1 AND id > $2 \
             ORDER BY id \
             LIMIT $3",
        )
        .bind(since)
        .bind(after_id.unwrap_or(i64::MIN))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_records(&self) -> Result<i64, RecordStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_modified_since(&self, since: DateTime<Utc>) -> Result<i64, RecordStoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE updated_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = ProductRow {
            id: 7,
            name: "Burr grinder".to_string(),
            description: None,
            price: 129.0,
            quantity: 4,
            category_id: 3,
            brand: Some("Baratza".to_string()),
            updated_at: Utc::now(),
        };

        let record: ProductRecord = row.into();
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Burr grinder");
        assert!(record.description.is_none());
        assert_eq!(record.brand.as_deref(), Some("Baratza"));
    }
}
