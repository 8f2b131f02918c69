//! Product submission endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::{ProductRequest, SyncReport};
use marketplace::{MarketplaceA, MarketplaceB, SyncCoordinator};
use serde::Deserialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<A: MarketplaceA, B: MarketplaceB> {
    pub coordinator: SyncCoordinator<A, B>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SubmitProductRequest {
    pub product: ProductRequest,
}

// -- Handlers --

/// POST /api/products — submit a product to both marketplaces.
///
/// Always answers `200 OK` with the full sync report; per-marketplace
/// rejections are carried inside the report rather than as HTTP errors.
#[tracing::instrument(skip(state, req))]
pub async fn submit<A: MarketplaceA + 'static, B: MarketplaceB + 'static>(
    State(state): State<Arc<AppState<A, B>>>,
    Json(req): Json<SubmitProductRequest>,
) -> Result<Json<SyncReport>, ApiError> {
    let report = state.coordinator.submit(&req.product).await?;
    Ok(Json(report))
}
