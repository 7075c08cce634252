//! Integration test helpers for Curbside.
//!
//! The tests in `tests/` drive a running server over HTTP. They require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p curbside-cli -- migrate`)
//! - The seeded demo catalog (businesses `drivebyapp`, `cafeshop`,
//!   `pizzaexpress` with their locations, spots, products, and modifiers)
//! - The server running (`cargo run -p curbside-server`)
//!
//! All tests are `#[ignore]`d by default; run with `cargo test -- --ignored`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CURBSIDE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client with a cookie store, so the QR scan's session binding
/// carries over to subsequent requests like a browser would.
///
/// Redirects are NOT followed automatically - several tests assert on the
/// redirect responses themselves.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Scan a QR code, establishing the session binding on the client's cookies.
///
/// # Panics
///
/// Panics if the request fails or the scan does not redirect to the menu.
pub async fn scan_spot(client: &Client, location_id: &str, qr_slug: &str) {
    let base = base_url();
    let resp = client
        .get(format!("{base}/l/{location_id}/s/{qr_slug}"))
        .send()
        .await
        .expect("Failed to scan QR code");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("scan must redirect");
    assert_eq!(location, "/menu");
}
