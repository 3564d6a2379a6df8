//! PostgreSQL implementation of ItemRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, ItemId, TenantId, Timestamp};
use crate::domain::item::Item;
use crate::ports::ItemRepository;

/// PostgreSQL implementation of ItemRepository.
#[derive(Clone)]
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    /// Creates a new PostgresItemRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn save(&self, item: &Item) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, tenant_id, title, sku, description, price_cents, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.tenant_id().as_uuid())
        .bind(item.title())
        .bind(item.sku())
        .bind(item.description())
        .bind(item.price_cents())
        .bind(item.created_at().as_datetime())
        .bind(item.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert item", e))?;

        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE items SET
                title = $3,
                description = $4,
                price_cents = $5,
                updated_at = $6
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(item.id().as_uuid())
        .bind(item.tenant_id().as_uuid())
        .bind(item.title())
        .bind(item.description())
        .bind(item.price_cents())
        .bind(item.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update item", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ItemNotFound,
                format!("Item not found: {}", item.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: &TenantId,
        id: &ItemId,
    ) -> Result<Option<Item>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, tenant_id, title, sku, description, price_cents, created_at, updated_at
            FROM items
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch item", e))?;

        row.map(row_to_item).transpose()
    }

    async fn delete(&self, tenant_id: &TenantId, id: &ItemId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND tenant_id = $2")
            .bind(id.as_uuid())
            .bind(tenant_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete item", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ItemNotFound,
                format!("Item not found: {}", id),
            ));
        }

        Ok(())
    }
}

fn row_to_item(row: sqlx::postgres::PgRow) -> Result<Item, DomainError> {
    let get_err = |column: &str, e: sqlx::Error| {
        DomainError::database(&format!("Failed to get {}", column), e)
    };

    let id: uuid::Uuid = row.try_get("id").map_err(|e| get_err("id", e))?;
    let tenant_id: uuid::Uuid = row.try_get("tenant_id").map_err(|e| get_err("tenant_id", e))?;
    let title: String = row.try_get("title").map_err(|e| get_err("title", e))?;
    let sku: String = row.try_get("sku").map_err(|e| get_err("sku", e))?;
    let description: Option<String> = row
        .try_get("description")
        .map_err(|e| get_err("description", e))?;
    let price_cents: i64 = row
        .try_get("price_cents")
        .map_err(|e| get_err("price_cents", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| get_err("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| get_err("updated_at", e))?;

    Ok(Item::reconstitute(
        ItemId::from_uuid(id),
        TenantId::from_uuid(tenant_id),
        title,
        sku,
        description,
        price_cents,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
