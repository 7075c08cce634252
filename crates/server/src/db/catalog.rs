//! Catalog repository for read-only database operations.
//!
//! Catalog rows are provisioned externally; this repository only reads them.
//! Lookups that feed order pricing are batched (`id = ANY($1)`) so a cart
//! resolves with one round-trip per entity kind.

use sqlx::PgPool;

use curbside_core::{BusinessId, LocationId, ModifierOptionId, ParkingSpotId, ProductId};

use super::RepositoryError;
use crate::models::catalog::{
    Business, Category, Location, ModifierGroup, ModifierOption, ParkingSpot, Product,
    ProductModifierLink, SpotBinding, ThemeTokens,
};

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a business by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn business_by_id(
        &self,
        id: &BusinessId,
    ) -> Result<Option<Business>, RepositoryError> {
        let business = sqlx::query_as::<_, Business>(
            "SELECT id, name, slug, currency FROM businesses WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(business)
    }

    /// Get a business by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn business_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let business = sqlx::query_as::<_, Business>(
            "SELECT id, name, slug, currency FROM businesses WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(business)
    }

    /// Resolve a normalized hostname to a business through `domain_mappings`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a mapping exists but the
    /// referenced business does not.
    pub async fn business_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Business>, RepositoryError> {
        let mapped = sqlx::query_scalar::<_, String>(
            "SELECT business_id FROM domain_mappings WHERE domain = $1",
        )
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        let Some(business_id) = mapped else {
            return Ok(None);
        };

        match self.business_by_id(&BusinessId::new(business_id)).await? {
            Some(business) => Ok(Some(business)),
            None => Err(RepositoryError::DataCorruption(format!(
                "domain mapping {domain} references a missing business"
            ))),
        }
    }

    /// Get the theme tokens for a business.
    ///
    /// Every business owns exactly one theme; a missing row is surfaced by
    /// the caller as corruption, not here, since some callers can degrade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn theme_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<ThemeTokens>, RepositoryError> {
        let theme = sqlx::query_as::<_, ThemeTokens>(
            r#"SELECT "primary", accent, text FROM themes WHERE business_id = $1"#,
        )
        .bind(business_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(theme)
    }

    /// Get the default location for a business.
    ///
    /// Deterministic choice: earliest `created_at`, tie-broken by id. This
    /// location's spot pool is the fallback fulfillment target when a cart
    /// arrives without a session spot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn default_location(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<Location>, RepositoryError> {
        let location = sqlx::query_as::<_, Location>(
            r"
            SELECT id, name, address, business_id, created_at
            FROM locations
            WHERE business_id = $1
            ORDER BY created_at, id
            LIMIT 1
            ",
        )
        .bind(business_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(location)
    }

    /// Get the first parking spot of a location (deterministic by id).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first_spot_for_location(
        &self,
        location_id: &LocationId,
    ) -> Result<Option<ParkingSpot>, RepositoryError> {
        let spot = sqlx::query_as::<_, ParkingSpot>(
            r"
            SELECT id, code, qr_slug, location_id
            FROM parking_spots
            WHERE location_id = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(location_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(spot)
    }

    /// Resolve a scanned `(location_id, qr_slug)` pair to a spot binding.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the spot exists but its
    /// location/business ownership chain is broken.
    pub async fn spot_binding(
        &self,
        location_id: &LocationId,
        qr_slug: &str,
    ) -> Result<Option<SpotBinding>, RepositoryError> {
        let row = sqlx::query_as::<_, (String, Option<String>)>(
            r"
            SELECT ps.id, b.id
            FROM parking_spots ps
            LEFT JOIN locations l ON l.id = ps.location_id
            LEFT JOIN businesses b ON b.id = l.business_id
            WHERE ps.location_id = $1 AND ps.qr_slug = $2
            ",
        )
        .bind(location_id.as_str())
        .bind(qr_slug)
        .fetch_optional(self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some((spot_id, Some(business_id))) => Ok(Some(SpotBinding {
                spot_id: ParkingSpotId::new(spot_id),
                business_id: BusinessId::new(business_id),
            })),
            Some((spot_id, None)) => Err(RepositoryError::DataCorruption(format!(
                "parking spot {spot_id} has no owning business"
            ))),
        }
    }

    /// Batch-fetch products by ID.
    ///
    /// Missing IDs are simply absent from the result; the order composer
    /// decides how to treat them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image_url, category_id, business_id
            FROM products
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Batch-fetch modifier options by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn modifier_options_by_ids(
        &self,
        ids: &[ModifierOptionId],
    ) -> Result<Vec<ModifierOption>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let options = sqlx::query_as::<_, ModifierOption>(
            r"
            SELECT id, name, price, modifier_group_id
            FROM modifier_options
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        Ok(options)
    }

    // =========================================================================
    // Menu Surface
    // =========================================================================

    /// All categories of a business, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, business_id FROM categories WHERE business_id = $1 ORDER BY name",
        )
        .bind(business_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// All products of a business, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image_url, category_id, business_id
            FROM products
            WHERE business_id = $1
            ORDER BY name
            ",
        )
        .bind(business_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// All modifier groups of a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn modifier_groups_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<ModifierGroup>, RepositoryError> {
        let groups = sqlx::query_as::<_, ModifierGroup>(
            r"
            SELECT id, name, required, max_choices, business_id
            FROM modifier_groups
            WHERE business_id = $1
            ORDER BY name
            ",
        )
        .bind(business_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(groups)
    }

    /// All modifier options of a business, joined through their groups.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn modifier_options_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<ModifierOption>, RepositoryError> {
        let options = sqlx::query_as::<_, ModifierOption>(
            r"
            SELECT mo.id, mo.name, mo.price, mo.modifier_group_id
            FROM modifier_options mo
            JOIN modifier_groups mg ON mg.id = mo.modifier_group_id
            WHERE mg.business_id = $1
            ORDER BY mo.name
            ",
        )
        .bind(business_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(options)
    }

    /// Product-to-modifier-group links for every product of a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_modifier_links_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<ProductModifierLink>, RepositoryError> {
        let links = sqlx::query_as::<_, ProductModifierLink>(
            r"
            SELECT pmg.product_id, pmg.modifier_group_id
            FROM product_modifier_groups pmg
            JOIN products p ON p.id = pmg.product_id
            WHERE p.business_id = $1
            ",
        )
        .bind(business_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(links)
    }
}
