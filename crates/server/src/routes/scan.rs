//! QR scan entry point.
//!
//! A parking spot's QR code encodes `/l/{location_id}/s/{qr_slug}`. Scanning
//! it is the only write path that binds an anonymous visitor to a business
//! and spot. The handler always ends in a redirect: to the menu on success,
//! to the neutral landing surface on any failure. On failure the session is
//! left untouched, so a prior binding survives a bad scan.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use curbside_core::LocationId;

use crate::db::CatalogRepository;
use crate::models::catalog::SpotBinding;
use crate::models::session::keys;
use crate::state::AppState;

/// Where successful scans land.
const MENU_PATH: &str = "/menu";

/// Where failed scans land.
const HOME_PATH: &str = "/";

/// Handle a QR scan: validate the spot and establish the session binding.
///
/// Repeated scans of the same URL are idempotent - they simply re-issue the
/// same binding with a fresh expiry.
#[instrument(skip(state, session))]
pub async fn scan(
    State(state): State<AppState>,
    session: Session,
    Path((location_id, qr_slug)): Path<(String, String)>,
) -> Response {
    let catalog = CatalogRepository::new(state.pool());
    let location_id = LocationId::new(location_id);

    match catalog.spot_binding(&location_id, &qr_slug).await {
        Ok(Some(binding)) => {
            if let Err(e) = write_binding(&session, &binding).await {
                tracing::error!(error = %e, "failed to persist spot binding");
                return Redirect::to(HOME_PATH).into_response();
            }
            tracing::info!(
                spot_id = %binding.spot_id,
                business_id = %binding.business_id,
                "session bound to spot"
            );
            Redirect::to(MENU_PATH).into_response()
        }
        Ok(None) => {
            tracing::debug!(location_id = %location_id, qr_slug, "unknown QR target");
            Redirect::to(HOME_PATH).into_response()
        }
        Err(e) => {
            // Integrity violations and store failures degrade to the neutral
            // landing surface; the session is not touched.
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "QR scan lookup failed");
            Redirect::to(HOME_PATH).into_response()
        }
    }
}

/// Write the business/spot pair into the session.
async fn write_binding(
    session: &Session,
    binding: &SpotBinding,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(keys::BUSINESS_ID, binding.business_id.as_str())
        .await?;
    session
        .insert(keys::PARKING_SPOT_ID, binding.spot_id.as_str())
        .await
}
