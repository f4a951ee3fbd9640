//! Identity hub SSO for Axum: the `/sso` redemption route, the session
//! cookie, and the access gate in front of everything else.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use report_hub::middleware::{SsoConfig, protect, sso_routes};
//!
//! let config = SsoConfig::from_env()?;
//!
//! // Mount /sso next to the application routes, then gate the whole router.
//! let app = axum::Router::new()
//!     .merge(sso_routes(config.clone()))
//!     .merge(app_routes);
//! let app = protect(app, &config);
//! ```

mod config;
mod cookies;
mod extractor;
mod gate;
mod routes;
mod state;

pub use config::{HUB_FALLBACK, SsoConfig};
pub use cookies::SESSION_COOKIE_NAME;
pub use extractor::{NoSession, SessionUser};
pub use gate::protect;
pub use routes::sso_routes;
