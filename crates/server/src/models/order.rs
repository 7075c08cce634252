//! Order entities and insert shapes.
//!
//! An order snapshots the resolved unit price of every line item and every
//! selected modifier option at creation time; a later catalog price change
//! never alters a persisted order. Orders are never deleted - cancellation is
//! a status value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use curbside_core::{
    BusinessId, ModifierOptionId, OrderId, OrderItemId, OrderStatus, ParkingSpotId, ProductId,
};

/// A persisted order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable label derived from the creation instant. Sortable and
    /// displayable; `id` remains the true primary key.
    pub order_number: String,
    pub status: OrderStatus,
    /// Server-computed total over all items and modifiers.
    pub total: Decimal,
    pub parking_spot_id: ParkingSpotId,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
}

/// A line item of a persisted order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    /// Product name at read time, joined for display.
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshot taken at order time (excludes modifiers).
    pub price: Decimal,
    pub modifiers: Vec<OrderItemModifier>,
}

/// A selected modifier option on a line item, with its price snapshot.
#[derive(Debug, Clone)]
pub struct OrderItemModifier {
    pub modifier_option_id: ModifierOptionId,
    pub name: String,
    /// Price delta snapshot taken at order time.
    pub price: Decimal,
}

/// An order together with its items and the spot's display code.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    /// Display label of the parking spot, when available at read time.
    pub spot_code: Option<String>,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Insert Shapes
// =============================================================================

/// A fully validated, fully priced order ready to persist.
///
/// Built by the order composer after all catalog lookups succeed; the
/// repository writes it atomically.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub total: Decimal,
    pub parking_spot_id: ParkingSpotId,
    pub business_id: BusinessId,
    pub items: Vec<NewOrderItem>,
}

/// One priced line item of a [`NewOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub modifiers: Vec<NewOrderItemModifier>,
}

/// One selected modifier option of a [`NewOrderItem`].
#[derive(Debug, Clone)]
pub struct NewOrderItemModifier {
    pub modifier_option_id: ModifierOptionId,
    pub name: String,
    pub price: Decimal,
}
