//! Order composition and lifecycle.
//!
//! The composer turns a client-submitted cart into a trustworthy, priced,
//! persisted order. Pricing is re-derived from the catalog on every call;
//! client-supplied unit prices are an optimistic-UI hint and never reach the
//! computation. All validation happens before any write, and the write
//! itself is one transaction.
//!
//! The catalog can mutate between the price lookup and the persist; the
//! snapshot uses whatever price was read at lookup time. Menu changes are
//! rare and out of band from ordering, so this race is accepted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use curbside_core::{BusinessId, ModifierOptionId, OrderId, OrderStatus, ParkingSpotId, ProductId};

use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::models::catalog::{ModifierOption, Product};
use crate::models::order::{NewOrder, NewOrderItem, NewOrderItemModifier, Order, OrderWithItems};

/// Page size for the order listing surface.
pub const RECENT_ORDERS_LIMIT: i64 = 20;

/// Failures composing or transitioning an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The submitted cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart item references a product that does not exist for the resolved
    /// business.
    #[error("unknown product: {0}")]
    InvalidProduct(ProductId),

    /// A cart item's quantity is below one.
    #[error("quantity must be at least 1 for product {0}")]
    InvalidQuantity(ProductId),

    /// A cart item references a modifier option that does not exist.
    /// Dropping it silently would change price semantics, so it is a hard
    /// error.
    #[error("unknown modifier option: {0}")]
    InvalidModifier(ModifierOptionId),

    /// The resolved business has no location or no parking spot to fulfil
    /// to, and the session carried none.
    #[error("business {0} has no parking spot to fulfil to")]
    NoFulfillmentTarget(BusinessId),

    /// The requested status is not one of the five recognized values.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// The order does not exist.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// The order is in a terminal state and admits no further transitions.
    #[error("order {id} is {status} and can no longer change status")]
    TerminalState { id: OrderId, status: OrderStatus },

    /// Catalog Store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One entry of a client-submitted cart, as seen by the composer.
///
/// The wire payload may also carry an advisory unit price; it is dropped at
/// the route boundary and never reaches this type.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub modifier_option_ids: Vec<ModifierOptionId>,
}

/// Compose and persist an order from a cart and the session's binding.
///
/// Resolution order:
/// 1. Empty carts are rejected outright.
/// 2. The business comes from the session, else is inferred from the first
///    cart item's product.
/// 3. The parking spot comes from the session, else falls back to the first
///    spot of the business's default location.
/// 4. Products and modifier options are batch-fetched, then every line is
///    priced from catalog state.
///
/// # Errors
///
/// Any validation failure aborts before any write; Catalog Store failures
/// propagate as [`OrderError::Repository`].
pub async fn create_order(
    catalog: &CatalogRepository<'_>,
    orders: &OrderRepository<'_>,
    cart: &[CartItem],
    session_business_id: Option<&BusinessId>,
    session_spot_id: Option<&ParkingSpotId>,
) -> Result<OrderWithItems, OrderError> {
    let Some(first) = cart.first() else {
        return Err(OrderError::EmptyCart);
    };

    let products = fetch_products(catalog, cart).await?;

    let business_id = match session_business_id {
        Some(id) => id.clone(),
        None => {
            // Infer the business from the first cart item's product.
            products
                .get(&first.product_id)
                .ok_or_else(|| OrderError::InvalidProduct(first.product_id.clone()))?
                .business_id
                .clone()
        }
    };

    let parking_spot_id = match session_spot_id {
        Some(id) => id.clone(),
        None => fallback_spot(catalog, &business_id).await?,
    };

    let options = fetch_modifier_options(catalog, cart).await?;
    let (total, items) = price_cart(&products, &options, &business_id, cart)?;

    let new_order = NewOrder {
        order_number: order_number_for(Utc::now()),
        total,
        parking_spot_id,
        business_id,
        items,
    };

    let order = orders.create(new_order).await?;
    tracing::info!(
        order_id = %order.order.id,
        order_number = %order.order.order_number,
        total = %order.order.total,
        "order created"
    );

    Ok(order)
}

/// Recent orders for the session's business, newest first, top
/// [`RECENT_ORDERS_LIMIT`]. Without a session business the listing is empty.
///
/// # Errors
///
/// Returns [`OrderError::Repository`] on Catalog Store failures.
pub async fn recent_orders(
    orders: &OrderRepository<'_>,
    session_business_id: Option<&BusinessId>,
    session_spot_id: Option<&ParkingSpotId>,
) -> Result<Vec<OrderWithItems>, OrderError> {
    let Some(business_id) = session_business_id else {
        return Ok(Vec::new());
    };

    orders
        .recent_for_business(business_id, session_spot_id, RECENT_ORDERS_LIMIT)
        .await
        .map_err(Into::into)
}

/// Transition an order to a new fulfillment status.
///
/// The raw status string is parsed before any mutation; unrecognized values
/// never touch the database. Terminal orders reject all transitions. Between
/// live states the contract is permissive (no adjacency enforcement);
/// concurrent updates are last-write-wins.
///
/// # Errors
///
/// [`OrderError::InvalidStatus`] for unrecognized values,
/// [`OrderError::NotFound`] for missing orders, [`OrderError::TerminalState`]
/// when the order can no longer change.
pub async fn set_status(
    orders: &OrderRepository<'_>,
    order_id: &OrderId,
    raw_status: &str,
) -> Result<Order, OrderError> {
    let status = raw_status
        .parse::<OrderStatus>()
        .map_err(|_| OrderError::InvalidStatus(raw_status.to_owned()))?;

    if let Some(order) = orders.set_status(order_id, status).await? {
        tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
        return Ok(order);
    }

    // No row updated: the order is either missing or already terminal.
    match orders.get(order_id).await? {
        None => Err(OrderError::NotFound(order_id.clone())),
        Some(existing) => Err(OrderError::TerminalState {
            id: order_id.clone(),
            status: existing.status,
        }),
    }
}

// =============================================================================
// Resolution Helpers
// =============================================================================

/// Batch-fetch every product referenced by the cart, keyed by ID.
async fn fetch_products(
    catalog: &CatalogRepository<'_>,
    cart: &[CartItem],
) -> Result<HashMap<ProductId, Product>, OrderError> {
    let mut ids: Vec<ProductId> = cart.iter().map(|item| item.product_id.clone()).collect();
    ids.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();

    let products = catalog.products_by_ids(&ids).await?;
    Ok(products
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect())
}

/// Batch-fetch every modifier option referenced by the cart, keyed by ID.
async fn fetch_modifier_options(
    catalog: &CatalogRepository<'_>,
    cart: &[CartItem],
) -> Result<HashMap<ModifierOptionId, ModifierOption>, OrderError> {
    let mut ids: Vec<ModifierOptionId> = cart
        .iter()
        .flat_map(|item| item.modifier_option_ids.iter().cloned())
        .collect();
    ids.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();

    let options = catalog.modifier_options_by_ids(&ids).await?;
    Ok(options
        .into_iter()
        .map(|option| (option.id.clone(), option))
        .collect())
}

/// Fallback fulfillment target: the first spot of the business's default
/// location.
async fn fallback_spot(
    catalog: &CatalogRepository<'_>,
    business_id: &BusinessId,
) -> Result<ParkingSpotId, OrderError> {
    let location = catalog
        .default_location(business_id)
        .await?
        .ok_or_else(|| OrderError::NoFulfillmentTarget(business_id.clone()))?;

    let spot = catalog
        .first_spot_for_location(&location.id)
        .await?
        .ok_or_else(|| OrderError::NoFulfillmentTarget(business_id.clone()))?;

    Ok(spot.id)
}

// =============================================================================
// Pricing
// =============================================================================

/// Price every cart line from catalog state and sum the order total.
///
/// `line_total = (product.price + Σ selected option prices) × quantity`.
/// The product's unit price and each option's delta are snapshotted into the
/// insert shapes. Pure over the fetched maps, so the arithmetic is testable
/// without a database.
fn price_cart(
    products: &HashMap<ProductId, Product>,
    options: &HashMap<ModifierOptionId, ModifierOption>,
    business_id: &BusinessId,
    cart: &[CartItem],
) -> Result<(Decimal, Vec<NewOrderItem>), OrderError> {
    let mut total = Decimal::ZERO;
    let mut items = Vec::with_capacity(cart.len());

    for entry in cart {
        let product = products
            .get(&entry.product_id)
            .filter(|p| &p.business_id == business_id)
            .ok_or_else(|| OrderError::InvalidProduct(entry.product_id.clone()))?;

        let quantity = i32::try_from(entry.quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| OrderError::InvalidQuantity(entry.product_id.clone()))?;

        let mut modifiers = Vec::with_capacity(entry.modifier_option_ids.len());
        let mut options_sum = Decimal::ZERO;
        for option_id in &entry.modifier_option_ids {
            let option = options
                .get(option_id)
                .ok_or_else(|| OrderError::InvalidModifier(option_id.clone()))?;
            options_sum += option.price;
            modifiers.push(NewOrderItemModifier {
                modifier_option_id: option.id.clone(),
                name: option.name.clone(),
                price: option.price,
            });
        }

        let line_total = (product.price + options_sum) * Decimal::from(quantity);
        total += line_total;

        items.push(NewOrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            modifiers,
        });
    }

    Ok((total, items))
}

/// Derive a human-readable order number from the creation instant.
///
/// Microsecond-derived so near-simultaneous orders at one business get
/// distinct labels; `id` remains the true primary key, so a collision is a
/// display blemish, not a correctness issue.
#[must_use]
pub fn order_number_for(created_at: DateTime<Utc>) -> String {
    let micros = created_at.timestamp_micros().rem_euclid(100_000_000);
    format!("ORD-{micros:08}")
}
