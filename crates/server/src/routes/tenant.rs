//! Tenant lookup surface.
//!
//! Consumed by every page-rendering collaborator. Absence of a tenant is a
//! normal response (`{"tenant": null}`), never a 4xx - the collaborator
//! renders a tenant-selection surface in that case.

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use curbside_core::Tenant;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::models::session::SpotSession;
use crate::services;
use crate::state::AppState;

/// Tenant lookup response.
#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub tenant: Option<Tenant>,
}

/// Resolve the tenant for the current request host and session.
#[instrument(skip(state, session, headers))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<TenantResponse>> {
    let spot_session = SpotSession::load(&session).await;
    let catalog = CatalogRepository::new(state.pool());

    let tenant = services::tenant::resolve(
        &catalog,
        request_host(&headers),
        spot_session.business_id.as_ref(),
    )
    .await?;

    Ok(Json(TenantResponse { tenant }))
}

/// The request's `Host` header, defaulting to the development placeholder.
pub(crate) fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(axum::http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn request_host_reads_the_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::HOST,
            HeaderValue::from_static("cafeshop.driveby.app:443"),
        );
        assert_eq!(request_host(&headers), "cafeshop.driveby.app:443");
    }

    #[test]
    fn request_host_defaults_to_localhost() {
        let headers = HeaderMap::new();
        assert_eq!(request_host(&headers), "localhost");
    }
}
