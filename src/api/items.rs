use axum::Json;
use axum::extract::State;

use super::error::ApiError;
use super::state::AppState;
use crate::catalog::{self, CatalogStore, ConfigurationItem};
use crate::middleware::SessionUser;
use crate::session::SessionPayload;

pub(super) async fn index(SessionUser(session): SessionUser) -> String {
    match session.name() {
        Some(name) => format!("Signed in as {name} <{}>", session.email()),
        None => format!("Signed in as {}", session.email()),
    }
}

pub(super) async fn me(SessionUser(session): SessionUser) -> Json<SessionPayload> {
    Json(session)
}

/// Normalized catalog for the report builder.
pub(super) async fn list<C: CatalogStore>(
    State(state): State<AppState<C>>,
) -> Result<Json<Vec<ConfigurationItem>>, ApiError> {
    let items = catalog::list_items(state.catalog.as_ref()).await?;
    Ok(Json(items))
}
