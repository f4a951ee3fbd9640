//! Report builder behind an identity hub's single sign-on.
//!
//! The hub hands users over with a signed token on `/sso`; the app verifies
//! it, mints an `app_session` cookie, and gates every other route on that
//! cookie. Behind the gate sits a configuration-item catalog and the report
//! assembly that exports selections as CSV or JSON drafts.

pub mod api;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod middleware;
pub mod report;
pub mod session;
pub mod signature;
pub mod sso;
pub mod types;

// Re-exports for convenient access
pub use api::{ApiError, router};
pub use config::{AppConfig, CatalogBackendConfig};
pub use error::Error;
pub use middleware::{SESSION_COOKIE_NAME, SessionUser, SsoConfig, protect, sso_routes};
pub use session::SessionPayload;
pub use signature::SsoSecret;
pub use sso::{Rejected, SsoTokenPayload, redeem, verify_token};
pub use types::ItemId;
