//! Catalog entities.
//!
//! All catalog data is provisioned by an external seeding/admin process and
//! is read-only from this service's perspective. Monetary values are decimal;
//! a product's `price` is the authoritative unit price and client-supplied
//! prices are never trusted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use curbside_core::{
    BusinessId, CategoryId, LocationId, ModifierGroupId, ModifierOptionId, ParkingSpotId,
    ProductId,
};

/// A tenant business sharing the deployment.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub slug: String,
    /// ISO 4217 currency code for all of the business's prices.
    pub currency: String,
}

/// Branding color tokens for a business (exactly one row per business).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThemeTokens {
    pub primary: String,
    pub accent: String,
    pub text: String,
}

/// A physical location of a business.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub business_id: BusinessId,
    pub created_at: DateTime<Utc>,
}

/// A parking spot at a location; `qr_slug` is the QR-encoded token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParkingSpot {
    pub id: ParkingSpotId,
    /// Display label shown to staff (e.g. `"A3"`).
    pub code: String,
    pub qr_slug: String,
    pub location_id: LocationId,
}

/// The resolved target of a QR scan: the spot plus the business owning it.
#[derive(Debug, Clone)]
pub struct SpotBinding {
    pub spot_id: ParkingSpotId,
    pub business_id: BusinessId,
}

/// A menu category of a business.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub business_id: BusinessId,
}

/// A purchasable product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Authoritative unit price in the business currency.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
    pub business_id: BusinessId,
}

/// A named set of priced add-on choices attachable to products.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModifierGroup {
    pub id: ModifierGroupId,
    pub name: String,
    pub required: bool,
    pub max_choices: i32,
    pub business_id: BusinessId,
}

/// One choice within a modifier group; `price` is a delta on the product price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModifierOption {
    pub id: ModifierOptionId,
    pub name: String,
    pub price: Decimal,
    pub modifier_group_id: ModifierGroupId,
}

/// Join row linking a product to an applicable modifier group.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductModifierLink {
    pub product_id: ProductId,
    pub modifier_group_id: ModifierGroupId,
}
