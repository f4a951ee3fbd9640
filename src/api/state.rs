use std::sync::Arc;

use crate::catalog::CatalogStore;

/// Shared state for the API handlers.
pub(super) struct AppState<C> {
    pub(super) catalog: Arc<C>,
}

impl<C: CatalogStore> AppState<C> {
    pub(super) fn new(catalog: C) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

// Manual Clone: avoid derive adding a `C: Clone` bound.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
        }
    }
}
