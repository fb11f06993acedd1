//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::routes::products::ProductView;
use crate::state::AppState;

/// Home page data: the hero product and the featured grid.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub hero: ProductView,
    pub featured: Vec<ProductView>,
}

/// Display home page.
///
/// GET /api/home
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let catalog = state.catalog();

    Json(HomeResponse {
        hero: ProductView::from(catalog.hero_product()),
        featured: catalog
            .featured_products()
            .into_iter()
            .map(ProductView::from)
            .collect(),
    })
}
