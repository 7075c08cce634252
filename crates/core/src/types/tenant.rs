//! Resolved tenant identity.
//!
//! A [`Tenant`] is the business/location context governing what a given
//! request sees: branding, catalog, and currency. It is produced by the
//! server's tenant resolver from the request host and session state, and is
//! consumed by every page-rendering collaborator. Absence of a tenant is a
//! normal outcome (the caller renders a tenant-selection surface), never an
//! error.

use serde::{Deserialize, Serialize};

use crate::types::id::LocationId;

/// Branding tokens and currency for a resolved tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Primary brand color token (e.g. `"#111827"`).
    pub primary: String,
    /// Accent color token.
    pub accent: String,
    /// Text color token.
    pub text: String,
    /// ISO 4217 currency code of the business (e.g. `"MXN"`).
    pub currency: String,
}

/// The business/location identity resolved for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// URL-safe slug of the resolved business.
    pub business_slug: String,
    /// Default location context for the business.
    pub location_id: LocationId,
    /// Branding and currency for rendering.
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let tenant = Tenant {
            business_slug: "cafeshop".to_owned(),
            location_id: LocationId::new("adc-location"),
            theme: Theme {
                primary: "#1F2937".to_owned(),
                accent: "#F59E0B".to_owned(),
                text: "#0B1020".to_owned(),
                currency: "MXN".to_owned(),
            },
        };

        let value = serde_json::to_value(&tenant).expect("serialize");
        assert_eq!(value["businessSlug"], "cafeshop");
        assert_eq!(value["locationId"], "adc-location");
        assert_eq!(value["theme"]["accent"], "#F59E0B");
    }
}
