//! Tenant resolution.
//!
//! Determines which business/location context an anonymous visitor belongs
//! to, purely from the request's host header and the session's business
//! binding. One deployment serves many branded storefronts: a hostname maps
//! to a business through `domain_mappings`, while loopback/development hosts
//! fall back to the session binding established by a QR scan.
//!
//! Resolution failure is not an error: the caller receives `Ok(None)` and
//! renders a tenant-selection surface. Only Catalog Store failures and
//! integrity violations surface as `Err`.

use curbside_core::{BusinessId, Tenant, Theme};

use crate::db::{CatalogRepository, RepositoryError};
use crate::models::catalog::Business;

/// Normalize a request host for domain-mapping lookup.
///
/// Strips any port (including from bracketed IPv6 literals), trims a
/// trailing dot, and lowercases.
#[must_use]
pub fn normalize_host(raw: &str) -> String {
    let host = raw.trim();

    // Bracketed IPv6 literal, e.g. "[::1]:3000"
    if let Some(rest) = host.strip_prefix('[') {
        if let Some((inner, _)) = rest.split_once(']') {
            return inner.to_ascii_lowercase();
        }
    }

    let without_port = host.split(':').next().unwrap_or(host);
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

/// Whether a normalized host is the loopback/development placeholder.
///
/// Subdomains of `localhost` (e.g. `cafeshop.localhost`) are NOT development
/// hosts - they resolve through domain mappings like any other hostname.
#[must_use]
pub fn is_development_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

/// Resolve the tenant for a request.
///
/// * Development hosts resolve from the session's business binding, if any.
/// * All other hosts resolve through an exact `domain_mappings` lookup.
///
/// # Errors
///
/// Returns `RepositoryError` on Catalog Store failures or integrity
/// violations (a dangling domain mapping, a business with no theme). A host
/// that simply maps to nothing is `Ok(None)`.
pub async fn resolve(
    catalog: &CatalogRepository<'_>,
    raw_host: &str,
    session_business_id: Option<&BusinessId>,
) -> Result<Option<Tenant>, RepositoryError> {
    let host = normalize_host(raw_host);

    let business = if is_development_host(&host) {
        let Some(id) = session_business_id else {
            return Ok(None);
        };
        match catalog.business_by_id(id).await? {
            Some(business) => business,
            None => {
                tracing::debug!(business_id = %id, "session business no longer exists");
                return Ok(None);
            }
        }
    } else {
        match catalog.business_by_domain(&host).await? {
            Some(business) => business,
            None => return Ok(None),
        }
    };

    tenant_for_business(catalog, business).await
}

/// Build the [`Tenant`] value for a resolved business.
///
/// The default location is the business's earliest-created one. A business
/// with no locations cannot serve visitors yet and resolves to `None`; a
/// missing theme violates the one-theme-per-business invariant and is
/// corruption.
async fn tenant_for_business(
    catalog: &CatalogRepository<'_>,
    business: Business,
) -> Result<Option<Tenant>, RepositoryError> {
    let Some(location) = catalog.default_location(&business.id).await? else {
        tracing::warn!(business = %business.slug, "business has no locations; not resolving tenant");
        return Ok(None);
    };

    let theme = catalog
        .theme_for_business(&business.id)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("business {} has no theme", business.slug))
        })?;

    Ok(Some(Tenant {
        business_slug: business.slug,
        location_id: location.id,
        theme: Theme {
            primary: theme.primary,
            accent: theme.accent,
            text: theme.text,
            currency: business.currency,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_port_and_lowercases() {
        assert_eq!(normalize_host("Cafeshop.DriveBy.App:8443"), "cafeshop.driveby.app");
        assert_eq!(normalize_host("localhost:3000"), "localhost");
        assert_eq!(normalize_host("orders.example.com"), "orders.example.com");
    }

    #[test]
    fn normalize_handles_ipv6_literals() {
        assert_eq!(normalize_host("[::1]:3000"), "::1");
        assert_eq!(normalize_host("[::1]"), "::1");
        assert_eq!(normalize_host("127.0.0.1:3000"), "127.0.0.1");
    }

    #[test]
    fn normalize_trims_trailing_dot() {
        assert_eq!(normalize_host("example.com."), "example.com");
    }

    #[test]
    fn development_hosts_are_exact_loopbacks() {
        assert!(is_development_host("localhost"));
        assert!(is_development_host("127.0.0.1"));
        assert!(is_development_host("::1"));

        // Subdomains of localhost resolve through domain mappings.
        assert!(!is_development_host("cafeshop.localhost"));
        assert!(!is_development_host("orders.example.com"));
    }
}
