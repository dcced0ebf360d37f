use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    ItemId, ItemRecord, OrderId, OrderLineId, OrderLineRecord, OrderRecord, OrderStatus, Result,
    StoreError, UserId,
    store::{ItemStore, OrderStore},
};

const ORDER_COLUMNS: &str = "id, user_id, status, created_at, updated_at";

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: &PgRow) -> Result<OrderRecord> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(OrderRecord {
            id: Some(OrderId::new(row.try_get("id")?)),
            user_id: UserId::new(row.try_get("user_id")?),
            status,
            lines: Vec::new(),
            created_at: Some(row.try_get("created_at")?),
            updated_at: Some(row.try_get("updated_at")?),
        })
    }

    fn row_to_line(row: &PgRow) -> Result<(OrderId, OrderLineRecord)> {
        let quantity: i32 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::Corrupt(format!("negative quantity {quantity}")))?;

        Ok((
            OrderId::new(row.try_get("order_id")?),
            OrderLineRecord {
                id: Some(OrderLineId::new(row.try_get("id")?)),
                item_id: ItemId::new(row.try_get("item_id")?),
                quantity,
            },
        ))
    }

    /// Loads the lines of the given orders and attaches them in position order.
    async fn attach_lines(&self, orders: &mut [OrderRecord]) -> Result<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = orders
            .iter()
            .filter_map(|order| order.id.map(|id| id.as_i64()))
            .collect();

        let rows = sqlx::query(
            r#"
            SELECT id, order_id, item_id, quantity
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id ASC, position ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderLineRecord>> = HashMap::new();
        for row in &rows {
            let (order_id, line) = Self::row_to_line(row)?;
            by_order.entry(order_id).or_default().push(line);
        }

        for order in orders.iter_mut() {
            if let Some(lines) = order.id.and_then(|id| by_order.remove(&id)) {
                order.lines = lines;
            }
        }
        Ok(())
    }

    async fn fetch_orders(&self, rows: Vec<PgRow>) -> Result<Vec<OrderRecord>> {
        let mut orders = rows
            .iter()
            .map(Self::row_to_order)
            .collect::<Result<Vec<_>>>()?;
        self.attach_lines(&mut orders).await?;
        Ok(orders)
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
        lines: &mut [OrderLineRecord],
    ) -> Result<()> {
        for (position, line) in lines.iter_mut().enumerate() {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                StoreError::Conflict(format!("quantity {} out of range", line.quantity))
            })?;
            let position = i32::try_from(position)
                .map_err(|_| StoreError::Conflict("too many order lines".to_string()))?;

            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO order_items (order_id, item_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(order_id.as_i64())
            .bind(line.item_id.as_i64())
            .bind(quantity)
            .bind(position)
            .fetch_one(&mut **tx)
            .await
            .map_err(map_write_error)?;

            line.id = Some(OrderLineId::new(id));
        }
        Ok(())
    }
}

/// Translates integrity constraint violations (SQLSTATE class 23) into conflicts.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.code().is_some_and(|code| code.starts_with("23"))
    {
        return StoreError::Conflict(db_err.message().to_string());
    }
    StoreError::Database(e)
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.fetch_orders(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all_by_id(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(OrderId::as_i64).collect();

        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        self.fetch_orders(rows).await
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY id ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        self.fetch_orders(rows).await
    }

    async fn save(&self, mut order: OrderRecord) -> Result<OrderRecord> {
        let mut tx = self.pool.begin().await?;

        let order_id = match order.id {
            None => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO orders (user_id, status)
                    VALUES ($1, $2)
                    RETURNING id, created_at, updated_at
                    "#,
                )
                .bind(order.user_id.as_i64())
                .bind(order.status.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(map_write_error)?;

                let id = OrderId::new(row.try_get("id")?);
                order.id = Some(id);
                order.created_at = Some(row.try_get("created_at")?);
                order.updated_at = Some(row.try_get("updated_at")?);
                id
            }
            Some(id) => {
                let row = sqlx::query(
                    r#"
                    UPDATE orders
                    SET user_id = $2, status = $3, updated_at = NOW()
                    WHERE id = $1
                    RETURNING created_at, updated_at
                    "#,
                )
                .bind(id.as_i64())
                .bind(order.user_id.as_i64())
                .bind(order.status.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_write_error)?
                .ok_or(StoreError::NotFound(id))?;

                order.created_at = Some(row.try_get("created_at")?);
                order.updated_at = Some(row.try_get("updated_at")?);

                sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                    .bind(id.as_i64())
                    .execute(&mut *tx)
                    .await?;
                id
            }
        };

        Self::insert_lines(&mut tx, order_id, &mut order.lines).await?;

        tx.commit().await?;
        tracing::debug!(%order_id, lines = order.lines.len(), "order saved");
        Ok(order)
    }

    async fn exists_by_id(&self, id: OrderId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM order_items")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for PostgresStore {
    async fn find_item_by_id(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        let row = sqlx::query("SELECT id, name, price_cents FROM items WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<ItemRecord> {
            Ok(ItemRecord {
                id: ItemId::new(row.try_get("id")?),
                name: row.try_get("name")?,
                price_cents: row.try_get("price_cents")?,
            })
        })
        .transpose()
    }
}
