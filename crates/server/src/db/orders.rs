//! Order repository for database operations.
//!
//! Order creation writes the order, its items, and their modifier snapshots
//! in one transaction - either the whole order and its children exist, or
//! none of them do. Status updates never touch items or totals.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use curbside_core::{BusinessId, ModifierOptionId, OrderId, OrderItemId, OrderStatus, ParkingSpotId, ProductId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem, OrderItemModifier, OrderWithItems};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    status: String,
    total: rust_decimal::Decimal,
    parking_spot_id: String,
    business_id: String,
    created_at: DateTime<Utc>,
    spot_code: Option<String>,
}

impl OrderRow {
    /// Convert to the domain model, validating the stored status value.
    fn into_order(self) -> Result<(Order, Option<String>), RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", self.id))
        })?;

        Ok((
            Order {
                id: OrderId::new(self.id),
                order_number: self.order_number,
                status,
                total: self.total,
                parking_spot_id: ParkingSpotId::new(self.parking_spot_id),
                business_id: BusinessId::new(self.business_id),
                created_at: self.created_at,
            },
            self.spot_code,
        ))
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    product_name: String,
    quantity: i32,
    price: rust_decimal::Decimal,
}

/// Internal row type for item modifier queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemModifierRow {
    order_item_id: String,
    modifier_option_id: String,
    name: String,
    price: rust_decimal::Decimal,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a composed order with its items and modifier snapshots.
    ///
    /// The whole write runs in one transaction; a failure at any point rolls
    /// back everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id = OrderId::new(Uuid::new_v4().to_string());
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r"
            INSERT INTO orders (id, order_number, status, total, parking_spot_id, business_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING created_at
            ",
        )
        .bind(order_id.as_str())
        .bind(&new_order.order_number)
        .bind(OrderStatus::Pending.as_str())
        .bind(new_order.total)
        .bind(new_order.parking_spot_id.as_str())
        .bind(new_order.business_id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in new_order.items {
            let item_id = OrderItemId::new(Uuid::new_v4().to_string());
            sqlx::query(
                r"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(item_id.as_str())
            .bind(order_id.as_str())
            .bind(item.product_id.as_str())
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;

            for modifier in &item.modifiers {
                sqlx::query(
                    r"
                    INSERT INTO order_item_modifiers (order_item_id, modifier_option_id, price)
                    VALUES ($1, $2, $3)
                    ",
                )
                .bind(item_id.as_str())
                .bind(modifier.modifier_option_id.as_str())
                .bind(modifier.price)
                .execute(&mut *tx)
                .await?;
            }

            items.push(OrderItem {
                id: item_id,
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                price: item.unit_price,
                modifiers: item
                    .modifiers
                    .into_iter()
                    .map(|m| OrderItemModifier {
                        modifier_option_id: m.modifier_option_id,
                        name: m.name,
                        price: m.price,
                    })
                    .collect(),
            });
        }

        tx.commit().await?;

        Ok(OrderWithItems {
            order: Order {
                id: order_id,
                order_number: new_order.order_number,
                status: OrderStatus::Pending,
                total: new_order.total,
                parking_spot_id: new_order.parking_spot_id,
                business_id: new_order.business_id,
                created_at,
            },
            spot_code: None,
            items,
        })
    }

    /// Get a single order (no items) by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is
    /// unrecognized.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.order_number, o.status, o.total, o.parking_spot_id,
                   o.business_id, o.created_at, NULL::text AS spot_code
            FROM orders o
            WHERE o.id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into_order()?.0)),
            None => Ok(None),
        }
    }

    /// Update an order's status.
    ///
    /// The predicate excludes terminal states so a concurrent staff action
    /// can never move a completed or cancelled order back to a live state.
    /// Returns `None` when no row was updated - the caller distinguishes
    /// "missing" from "terminal" with [`Self::get`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is
    /// unrecognized.
    pub async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $2
            WHERE id = $1 AND status NOT IN ('completed', 'cancelled')
            RETURNING id, order_number, status, total, parking_spot_id,
                      business_id, created_at, NULL::text AS spot_code
            ",
        )
        .bind(id.as_str())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into_order()?.0)),
            None => Ok(None),
        }
    }

    /// Recent orders for a business, newest first, optionally narrowed to one
    /// parking spot.
    ///
    /// Items and modifier snapshots are batch-loaded with one query per
    /// entity kind rather than per order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is
    /// unrecognized.
    pub async fn recent_for_business(
        &self,
        business_id: &BusinessId,
        parking_spot_id: Option<&ParkingSpotId>,
        limit: i64,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.order_number, o.status, o.total, o.parking_spot_id,
                   o.business_id, o.created_at, ps.code AS spot_code
            FROM orders o
            LEFT JOIN parking_spots ps ON ps.id = o.parking_spot_id
            WHERE o.business_id = $1
              AND ($2::text IS NULL OR o.parking_spot_id = $2)
            ORDER BY o.created_at DESC
            LIMIT $3
            ",
        )
        .bind(business_id.as_str())
        .bind(parking_spot_id.map(ParkingSpotId::as_str))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let (order, spot_code) = row.into_order()?;
            orders.push(OrderWithItems {
                order,
                spot_code,
                items: Vec::new(),
            });
        }

        if orders.is_empty() {
            return Ok(orders);
        }

        let order_ids: Vec<String> = orders
            .iter()
            .map(|o| o.order.id.as_str().to_owned())
            .collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                   oi.quantity, oi.price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let item_ids: Vec<String> = item_rows.iter().map(|r| r.id.clone()).collect();
        let modifier_rows = if item_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, ItemModifierRow>(
                r"
                SELECT oim.order_item_id, oim.modifier_option_id,
                       mo.name, oim.price
                FROM order_item_modifiers oim
                JOIN modifier_options mo ON mo.id = oim.modifier_option_id
                WHERE oim.order_item_id = ANY($1)
                ",
            )
            .bind(&item_ids)
            .fetch_all(self.pool)
            .await?
        };

        let mut modifiers_by_item: HashMap<String, Vec<OrderItemModifier>> = HashMap::new();
        for m in modifier_rows {
            modifiers_by_item
                .entry(m.order_item_id)
                .or_default()
                .push(OrderItemModifier {
                    modifier_option_id: ModifierOptionId::new(m.modifier_option_id),
                    name: m.name,
                    price: m.price,
                });
        }

        for item_row in item_rows {
            let modifiers = modifiers_by_item.remove(&item_row.id).unwrap_or_default();
            let order_id = item_row.order_id;
            let item = OrderItem {
                id: OrderItemId::new(item_row.id),
                product_id: ProductId::new(item_row.product_id),
                product_name: item_row.product_name,
                quantity: item_row.quantity,
                price: item_row.price,
                modifiers,
            };

            if let Some(parent) = orders
                .iter_mut()
                .find(|o| o.order.id.as_str() == order_id)
            {
                parent.items.push(item);
            }
        }

        Ok(orders)
    }
}
