//! Order API route handlers.
//!
//! The create endpoint accepts a cart whose `unitPrice` fields are an
//! optimistic-UI hint only; the composer re-derives every price from the
//! catalog. The status endpoint serves both the staff dashboard's plain form
//! submissions (redirect response) and JSON API callers (order response).

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use curbside_core::{
    BusinessId, ModifierOptionId, OrderId, OrderItemId, OrderStatus, ParkingSpotId, ProductId,
};

use crate::db::{CatalogRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::order::{Order, OrderItem, OrderItemModifier, OrderWithItems};
use crate::models::session::SpotSession;
use crate::services;
use crate::services::orders::CartItem;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Create-order request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
}

/// One cart entry as submitted by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPayload {
    pub product_id: String,
    pub quantity: u32,
    /// Optimistic-UI hint; the catalog price is authoritative.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub modifier_option_ids: Vec<String>,
}

impl From<CartItemPayload> for CartItem {
    fn from(payload: CartItemPayload) -> Self {
        // unit_price is deliberately dropped here.
        Self {
            product_id: ProductId::new(payload.product_id),
            quantity: payload.quantity,
            modifier_option_ids: payload
                .modifier_option_ids
                .into_iter()
                .map(ModifierOptionId::new)
                .collect(),
        }
    }
}

/// Status transition body, accepted as form data or JSON.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// Order display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub parking_spot_id: ParkingSpotId,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_code: Option<String>,
    pub items: Vec<OrderItemView>,
}

/// Line item display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub modifiers: Vec<OrderItemModifierView>,
}

/// Selected modifier display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemModifierView {
    pub modifier_option_id: ModifierOptionId,
    pub name: String,
    pub price: Decimal,
}

/// Order summary without items (status transition response).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub parking_spot_id: ParkingSpotId,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
}

impl From<OrderWithItems> for OrderView {
    fn from(order: OrderWithItems) -> Self {
        let OrderWithItems {
            order,
            spot_code,
            items,
        } = order;
        Self {
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            total: order.total,
            parking_spot_id: order.parking_spot_id,
            business_id: order.business_id,
            created_at: order.created_at,
            spot_code,
            items: items.into_iter().map(OrderItemView::from).collect(),
        }
    }
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            modifiers: item
                .modifiers
                .into_iter()
                .map(OrderItemModifierView::from)
                .collect(),
        }
    }
}

impl From<OrderItemModifier> for OrderItemModifierView {
    fn from(modifier: OrderItemModifier) -> Self {
        Self {
            modifier_option_id: modifier.modifier_option_id,
            name: modifier.name,
            price: modifier.price,
        }
    }
}

impl From<Order> for OrderSummaryView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            total: order.total,
            parking_spot_id: order.parking_spot_id,
            business_id: order.business_id,
            created_at: order.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List recent orders for the session's business.
///
/// Narrowed to the session's parking spot when one is bound. Without a
/// session business the listing is empty rather than an error.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response> {
    let spot_session = SpotSession::load(&session).await;
    let orders = OrderRepository::new(state.pool());

    let recent = services::orders::recent_orders(
        &orders,
        spot_session.business_id.as_ref(),
        spot_session.parking_spot_id.as_ref(),
    )
    .await?;

    let views: Vec<OrderView> = recent.into_iter().map(OrderView::from).collect();
    Ok(Json(json!({ "orders": views })).into_response())
}

/// Create an order from the submitted cart and the session's binding.
#[instrument(skip(state, session, request))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Response> {
    let spot_session = SpotSession::load(&session).await;
    let catalog = CatalogRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());

    let cart: Vec<CartItem> = request.items.into_iter().map(CartItem::from).collect();

    let order = services::orders::create_order(
        &catalog,
        &orders,
        &cart,
        spot_session.business_id.as_ref(),
        spot_session.parking_spot_id.as_ref(),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "order": OrderView::from(order),
    }))
    .into_response())
}

/// Transition an order's fulfillment status.
///
/// The dashboard posts a plain form and expects a redirect back; API callers
/// post JSON and get the updated order. Both carry a `status` field.
#[instrument(skip(state, headers, body))]
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Response> {
    let wants_json = is_json_request(&headers);
    let payload: StatusPayload = if wants_json {
        serde_json::from_str(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid status body: {e}")))?
    } else {
        serde_urlencoded::from_str(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid status form: {e}")))?
    };

    let orders = OrderRepository::new(state.pool());
    let order = services::orders::set_status(&orders, &OrderId::new(id), &payload.status).await?;

    if wants_json {
        Ok(Json(json!({
            "success": true,
            "order": OrderSummaryView::from(order),
        }))
        .into_response())
    } else {
        // Dashboard form submission: back to the orders board.
        Ok(Redirect::to("/dashboard/orders").into_response())
    }
}

/// Whether the request body is JSON (as opposed to a form post).
fn is_json_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}
