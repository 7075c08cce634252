//! HTTP route handlers for the ordering service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (verifies database)
//!
//! # QR scan entry point
//! GET  /l/{location_id}/s/{qr_slug} - Bind session to a spot, redirect to /menu
//!
//! # Tenant lookup surface
//! GET  /api/tenant                  - Resolved tenant for this host/session, or null
//!
//! # Menu data surface
//! GET  /api/menu                    - Categories, products, and modifiers for the tenant
//!
//! # Order API
//! GET  /api/orders                  - Recent orders for the session's business
//! POST /api/orders                  - Create an order from a cart
//! POST /api/orders/{id}/status      - Transition fulfillment status (form or JSON)
//! ```

pub mod menu;
pub mod orders;
pub mod scan;
pub mod tenant;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order API routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}/status", post(orders::set_status))
}

/// Create all routes for the ordering service.
pub fn routes() -> Router<AppState> {
    Router::new()
        // QR scan entry point
        .route("/l/{location_id}/s/{qr_slug}", get(scan::scan))
        // Tenant lookup surface
        .route("/api/tenant", get(tenant::show))
        // Menu data surface
        .route("/api/menu", get(menu::show))
        // Order API
        .nest("/api/orders", order_routes())
}
