//! HTTP surface of the report builder.
//!
//! Every route except `/sso`, `/logout`, and static assets sits behind the
//! hub access gate.

mod admin;
mod error;
mod items;
mod report;
mod state;

use axum::Router;
use axum::routing::{get, post, put};

pub use error::ApiError;

use crate::catalog::CatalogStore;
use crate::middleware::{SsoConfig, protect, sso_routes};
use state::AppState;

/// Build the full application router over `catalog`.
pub fn router<C: CatalogStore>(sso: SsoConfig, catalog: C) -> Router {
    let api = Router::new()
        .route("/", get(items::index))
        .route("/api/me", get(items::me))
        .route("/api/items", get(items::list::<C>))
        .route("/api/report/preview", post(report::preview::<C>))
        .route("/api/report/selection", post(report::edit_selection::<C>))
        .route("/api/report/csv", post(report::csv_export))
        .route("/api/report/draft", post(report::draft_export))
        .route("/api/report/draft/import", post(report::draft_import))
        .route(
            "/api/admin/items",
            get(admin::list::<C>).post(admin::create::<C>),
        )
        .route(
            "/api/admin/items/{id}",
            put(admin::update::<C>).delete(admin::delete::<C>),
        )
        .with_state(AppState::new(catalog));

    let app = Router::new().merge(sso_routes(sso.clone())).merge(api);
    protect(app, &sso)
}
