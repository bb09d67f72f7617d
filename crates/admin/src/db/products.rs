//! Product repository for `PostgreSQL`.
//!
//! Metadata lives in a JSONB column. Updates merge the patch into the stored
//! object (`metadata || patch`), so keys are never removed through this path.

use std::collections::HashMap;

use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{instrument, warn};

use extended_products_core::{MetadataMap, Product, ProductId, ProductUpdate, ProductVariant, VariantId};

use super::RepositoryError;
use crate::store::{ProductQuery, ProductStore};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    description: Option<String>,
    metadata: Option<Json<Value>>,
}

/// Internal row type for variant queries.
#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: String,
    product_id: String,
    title: String,
    inventory_quantity: i64,
}

impl ProductRow {
    fn into_product(self, variants: Vec<ProductVariant>) -> Result<Product, RepositoryError> {
        let id = ProductId::parse(self.id)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid product id: {e}")))?;

        let metadata = match self.metadata.map(|Json(v)| v) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                warn!(product_id = %id, kind = json_kind(&other), "Ignoring non-object product metadata");
                None
            }
        };

        Ok(Product {
            id,
            title: self.title,
            description: self.description,
            metadata,
            variants,
        })
    }
}

impl TryFrom<VariantRow> for ProductVariant {
    type Error = RepositoryError;

    fn try_from(row: VariantRow) -> Result<Self, Self::Error> {
        let id = VariantId::parse(row.id)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid variant id: {e}")))?;

        Ok(Self {
            id,
            title: row.title,
            inventory_quantity: row.inventory_quantity,
        })
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Product store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a trivial query to check connectivity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Insert or replace a product and its variants.
    ///
    /// Unlike [`ProductStore::update`], this replaces the metadata object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO products (id, title, description, metadata)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                description = EXCLUDED.description,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            ",
        )
        .bind(product.id.as_str())
        .bind(&product.title)
        .bind(product.description.as_deref())
        .bind(product.metadata.clone().map(|m| Json(Value::Object(m))))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
            .bind(product.id.as_str())
            .execute(&mut *tx)
            .await?;

        for variant in &product.variants {
            sqlx::query(
                r"
                INSERT INTO product_variants (id, product_id, title, inventory_quantity)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(variant.id.as_str())
            .bind(product.id.as_str())
            .bind(&variant.title)
            .bind(variant.inventory_quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::Conflict(format!("variant {} already exists", variant.id))
                }
                other => RepositoryError::Database(other),
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load variants for a set of products, grouped by product ID.
    async fn variants_for(
        &self,
        product_ids: &[String],
    ) -> Result<HashMap<String, Vec<ProductVariant>>, RepositoryError> {
        let rows: Vec<VariantRow> = sqlx::query_as(
            r"
            SELECT id, product_id, title, inventory_quantity
            FROM product_variants
            WHERE product_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<String, Vec<ProductVariant>> = HashMap::new();
        for row in rows {
            let product_id = row.product_id.clone();
            grouped.entry(product_id).or_default().push(row.try_into()?);
        }
        Ok(grouped)
    }

    async fn attach_variants(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut variants = self.variants_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let own = variants.remove(&row.id).unwrap_or_default();
                row.into_product(own)
            })
            .collect()
    }
}

impl ProductStore for PgProductStore {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            SELECT id, title, description, metadata
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.attach_variants(vec![row])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, update), fields(product_id = %id))]
    async fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RepositoryError> {
        let patch: Option<Json<Value>> = update.metadata.map(|m: MetadataMap| Json(Value::Object(m)));

        let row: ProductRow = sqlx::query_as(
            r"
            UPDATE products
            SET description = COALESCE($2, description),
                metadata = CASE
                    WHEN $3::jsonb IS NULL THEN metadata
                    WHEN jsonb_typeof(metadata) = 'object' THEN metadata || $3::jsonb
                    ELSE $3::jsonb
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, metadata
            ",
        )
        .bind(id.as_str())
        .bind(update.description)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.attach_variants(vec![row])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, title, description, metadata
            FROM products
            WHERE $1::text IS NULL OR title ILIKE '%' || $1 || '%'
            ORDER BY id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(query.q.as_deref())
        .bind(i64::from(query.limit))
        .bind(i64::from(query.offset))
        .fetch_all(&self.pool)
        .await?;

        self.attach_variants(rows).await
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &ProductQuery) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM products
            WHERE $1::text IS NULL OR title ILIKE '%' || $1 || '%'
            ",
        )
        .bind(query.q.as_deref())
        .fetch_one(&self.pool)
        .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative product count: {count}")))
    }
}
