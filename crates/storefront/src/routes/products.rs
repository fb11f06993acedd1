//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delta_gear_core::{CategoryFilter, Product, SortKey, filter_and_sort};

use crate::error::Result;
use crate::state::AppState;

/// Number of related products shown on a detail page.
pub const RELATED_LIMIT: usize = 3;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub category: &'static str,
    pub badge: &'static str,
    pub price: u32,
    pub price_display: String,
    pub original_price: Option<String>,
    pub savings: Option<String>,
    pub on_sale: bool,
    pub featured: bool,
    pub image: String,
    pub specs: Vec<SpecView>,
}

/// One labelled spec line.
#[derive(Debug, Clone, Serialize)]
pub struct SpecView {
    pub label: &'static str,
    pub value: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            tagline: product.tagline.clone(),
            category: product.category.label(),
            badge: product.category.badge(),
            price: product.price.dollars(),
            price_display: product.price.display(),
            original_price: product
                .original_price
                .filter(|_| product.is_on_sale())
                .map(|p| p.display()),
            savings: product.savings().map(|p| p.display()),
            on_sale: product.is_on_sale(),
            featured: product.featured,
            image: product.image.clone(),
            specs: product
                .specs
                .entries()
                .into_iter()
                .map(|(label, value)| SpecView {
                    label,
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// One entry of the sort selector.
#[derive(Debug, Clone, Serialize)]
pub struct SortOption {
    pub value: SortKey,
    pub label: &'static str,
}

impl From<SortKey> for SortOption {
    fn from(key: SortKey) -> Self {
        Self {
            value: key,
            label: key.label(),
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub category: CategoryFilter,
    pub sort: SortKey,
    pub heading: &'static str,
    pub count: usize,
    pub products: Vec<ProductView>,
    pub sort_options: Vec<SortOption>,
}

/// Product detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub product: ProductView,
    /// Listing filter for the product's own category, for the back link.
    pub listing_category: CategoryFilter,
    pub related_products: Vec<ProductView>,
}

/// List products.
///
/// GET /api/products?category=&sort=
///
/// An unknown category is rejected; an unknown sort falls back to featured.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>> {
    let category: CategoryFilter = query.category.as_deref().unwrap_or_default().parse()?;
    let sort = query.sort.as_deref().map(SortKey::parse).unwrap_or_default();

    let products: Vec<ProductView> =
        filter_and_sort(state.catalog().list_products(), category, sort)
            .into_iter()
            .map(ProductView::from)
            .collect();

    Ok(Json(ListingResponse {
        category,
        sort,
        heading: category.heading(),
        count: products.len(),
        products,
        sort_options: SortKey::ALL.into_iter().map(SortOption::from).collect(),
    }))
}

/// Show one product and its related products.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>> {
    let catalog = state.catalog();
    let product = catalog.get_product(&id)?;
    let related_products = catalog
        .related_products(product, RELATED_LIMIT)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(Json(DetailResponse {
        product: ProductView::from(product),
        listing_category: product.category.into(),
        related_products,
    }))
}
