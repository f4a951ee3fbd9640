use crate::types::ItemId;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[cfg(feature = "postgrest")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog backend error during {operation} (status {status}): {detail}")]
    Backend {
        operation: &'static str,
        status: u16,
        detail: String,
    },
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
    #[error("Configuration item not found: {0}")]
    NotFound(ItemId),
    #[error("Invalid draft: {0}")]
    Draft(String),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
