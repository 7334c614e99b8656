//! Quote handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use quoter_core::tips::SavingsTips;
use quoter_core::{ProfileRequest, Quote};

/// POST /api/quote - Compute a premium quote for a driver profile
///
/// Validation failures list every offending field; identical requests
/// always produce identical quotes.
pub async fn compute_quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<Quote>, AppError> {
    let quote = state
        .engine
        .compute_quote(&request)
        .map_err(AppError::from_engine)?;
    Ok(Json(quote))
}

/// POST /api/savings-tips - Personalized savings suggestions
///
/// Accepts a partial profile; absent fields simply produce no tips.
pub async fn savings_tips(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Json<SavingsTips> {
    Json(state.engine.savings_tips(&request))
}
