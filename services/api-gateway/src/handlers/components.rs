//! Component Handlers
//!
//! CRUD, search and stock alerts over the component store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::{middleware::ApiResult, AppState};
use partbin_database::{ComponentFilter, InventoryStats, MergeOutcome};
use partbin_models::{Component, ComponentUpdate, NewComponent};
use partbin_utils::{validate_model, validate_uuid, PartbinError};

fn component_not_found(id: &str) -> PartbinError {
    PartbinError::not_found(format!("component {}", id))
}

/// GET /api/v1/components?search=&category=
pub async fn list_components(
    State(state): State<AppState>,
    Query(filter): Query<ComponentFilter>,
) -> Json<Vec<Component>> {
    Json(state.components.list(&filter).await)
}

/// GET /api/v1/components/:id
pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Component>> {
    let uuid = validate_uuid(&id)?;
    let component = state
        .components
        .find_by_id(uuid)
        .await
        .ok_or_else(|| component_not_found(&id))?;
    Ok(Json(component))
}

/// POST /api/v1/components
pub async fn create_component(
    State(state): State<AppState>,
    Json(new): Json<NewComponent>,
) -> ApiResult<(StatusCode, Json<Component>)> {
    validate_model(&new)?;
    let component = state.components.create(new.into()).await?;
    Ok((StatusCode::CREATED, Json(component)))
}

/// PATCH /api/v1/components/:id
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ComponentUpdate>,
) -> ApiResult<Json<Component>> {
    let uuid = validate_uuid(&id)?;
    let component = state
        .components
        .update(uuid, update)
        .await?
        .ok_or_else(|| component_not_found(&id))?;
    Ok(Json(component))
}

/// DELETE /api/v1/components/:id
pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let uuid = validate_uuid(&id)?;
    if state.components.delete(uuid).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(component_not_found(&id).into())
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
}

/// DELETE /api/v1/components
pub async fn clear_components(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.components.clear().await;
    Json(ClearResponse { removed })
}

/// POST /api/v1/components/merge-duplicates
pub async fn merge_duplicate_components(State(state): State<AppState>) -> Json<MergeOutcome> {
    Json(state.components.merge_duplicates().await)
}

/// GET /api/v1/components/alerts/low-stock
pub async fn low_stock_components(State(state): State<AppState>) -> Json<Vec<Component>> {
    Json(state.components.low_stock().await)
}

/// GET /api/v1/stats
pub async fn inventory_stats(State(state): State<AppState>) -> Json<InventoryStats> {
    Json(state.components.stats().await)
}
