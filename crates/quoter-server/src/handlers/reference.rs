//! Reference data handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use quoter_core::{BrandStats, ModelMetadata};

/// Response for the brand comparison endpoint
#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<BrandStats>,
}

/// GET /api/brands - Premium statistics per vehicle make
///
/// Makes are sorted alphabetically; a make absent from the reference
/// population is simply not listed.
pub async fn brand_comparison(State(state): State<Arc<AppState>>) -> Json<BrandsResponse> {
    Json(BrandsResponse {
        brands: state.engine.brand_comparison(),
    })
}

/// GET /api/model - Static facts about the loaded artifacts
pub async fn model_metadata(State(state): State<Arc<AppState>>) -> Json<ModelMetadata> {
    Json(state.engine.metadata())
}
