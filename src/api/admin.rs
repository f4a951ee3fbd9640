use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::error::ApiError;
use super::state::AppState;
use crate::catalog::{CatalogStore, ConfigurationItemRecord, ItemForm};
use crate::types::ItemId;

pub(super) async fn list<C: CatalogStore>(
    State(state): State<AppState<C>>,
) -> Result<Json<Vec<ConfigurationItemRecord>>, ApiError> {
    Ok(Json(state.catalog.list_raw().await?))
}

pub(super) async fn create<C: CatalogStore>(
    State(state): State<AppState<C>>,
    Json(form): Json<ItemForm>,
) -> Result<(StatusCode, Json<ConfigurationItemRecord>), ApiError> {
    let input = form.validate()?;
    let record = state.catalog.create(input).await?;
    tracing::info!(id = %record.id, "Catalog item created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub(super) async fn update<C: CatalogStore>(
    State(state): State<AppState<C>>,
    Path(id): Path<ItemId>,
    Json(form): Json<ItemForm>,
) -> Result<Json<ConfigurationItemRecord>, ApiError> {
    let input = form.validate()?;
    let record = state.catalog.update(&id, input).await?;
    tracing::info!(id = %record.id, "Catalog item updated");
    Ok(Json(record))
}

pub(super) async fn delete<C: CatalogStore>(
    State(state): State<AppState<C>>,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete(&id).await?;
    tracing::info!(id = %id, "Catalog item deleted");
    Ok(StatusCode::NO_CONTENT)
}
