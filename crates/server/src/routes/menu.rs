//! Menu data surface.
//!
//! Serves the resolved tenant's catalog - categories with their products,
//! each product carrying its applicable modifier groups and options - as the
//! data behind the menu-browsing surface. Catalog lookups are batched per
//! entity kind, then assembled in memory.

use std::collections::HashMap;

use axum::{Json, extract::State, http::HeaderMap};
use rust_decimal::Decimal;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use curbside_core::{CategoryId, ModifierGroupId, ModifierOptionId, ProductId};

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::catalog::{ModifierGroup, ModifierOption, Product};
use crate::models::session::SpotSession;
use crate::routes::tenant::request_host;
use crate::services;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Menu response for the resolved tenant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub business_slug: String,
    pub currency: String,
    pub categories: Vec<MenuCategory>,
}

/// A category with its products.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: CategoryId,
    pub name: String,
    pub products: Vec<MenuProduct>,
}

/// A product with its applicable modifier groups.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub modifier_groups: Vec<MenuModifierGroup>,
}

/// A modifier group with its options.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuModifierGroup {
    pub id: ModifierGroupId,
    pub name: String,
    pub required: bool,
    pub max_choices: i32,
    pub options: Vec<MenuModifierOption>,
}

/// One priced choice within a modifier group.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuModifierOption {
    pub id: ModifierOptionId,
    pub name: String,
    pub price: Decimal,
}

// =============================================================================
// Handler
// =============================================================================

/// Serve the menu for the resolved tenant.
#[instrument(skip(state, session, headers))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<MenuResponse>> {
    let spot_session = SpotSession::load(&session).await;
    let catalog = CatalogRepository::new(state.pool());

    let tenant = services::tenant::resolve(
        &catalog,
        request_host(&headers),
        spot_session.business_id.as_ref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("no tenant for this host".to_string()))?;

    let business = catalog
        .business_by_slug(&tenant.business_slug)
        .await?
        .ok_or_else(|| AppError::NotFound("no tenant for this host".to_string()))?;

    let categories = catalog.categories_for_business(&business.id).await?;
    let products = catalog.products_for_business(&business.id).await?;
    let groups = catalog.modifier_groups_for_business(&business.id).await?;
    let options = catalog.modifier_options_for_business(&business.id).await?;
    let links = catalog
        .product_modifier_links_for_business(&business.id)
        .await?;

    // Group options under their groups, then groups under their products.
    let mut options_by_group: HashMap<ModifierGroupId, Vec<&ModifierOption>> = HashMap::new();
    for option in &options {
        options_by_group
            .entry(option.modifier_group_id.clone())
            .or_default()
            .push(option);
    }

    let groups_by_id: HashMap<&ModifierGroupId, &ModifierGroup> =
        groups.iter().map(|g| (&g.id, g)).collect();

    let mut group_ids_by_product: HashMap<ProductId, Vec<ModifierGroupId>> = HashMap::new();
    for link in links {
        group_ids_by_product
            .entry(link.product_id)
            .or_default()
            .push(link.modifier_group_id);
    }

    let mut products_by_category: HashMap<CategoryId, Vec<MenuProduct>> = HashMap::new();
    for product in products {
        let view = product_view(&product, &group_ids_by_product, &groups_by_id, &options_by_group);
        products_by_category
            .entry(product.category_id)
            .or_default()
            .push(view);
    }

    let categories = categories
        .into_iter()
        .map(|category| MenuCategory {
            products: products_by_category.remove(&category.id).unwrap_or_default(),
            id: category.id,
            name: category.name,
        })
        .collect();

    Ok(Json(MenuResponse {
        business_slug: business.slug,
        currency: business.currency,
        categories,
    }))
}

/// Assemble the view of one product with its modifier groups.
fn product_view(
    product: &Product,
    group_ids_by_product: &HashMap<ProductId, Vec<ModifierGroupId>>,
    groups_by_id: &HashMap<&ModifierGroupId, &ModifierGroup>,
    options_by_group: &HashMap<ModifierGroupId, Vec<&ModifierOption>>,
) -> MenuProduct {
    let modifier_groups = group_ids_by_product
        .get(&product.id)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|group_id| groups_by_id.get(group_id))
        .map(|group| MenuModifierGroup {
            id: group.id.clone(),
            name: group.name.clone(),
            required: group.required,
            max_choices: group.max_choices,
            options: options_by_group
                .get(&group.id)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|option| MenuModifierOption {
                    id: option.id.clone(),
                    name: option.name.clone(),
                    price: option.price,
                })
                .collect(),
        })
        .collect();

    MenuProduct {
        id: product.id.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        image_url: product.image_url.clone(),
        modifier_groups,
    }
}
