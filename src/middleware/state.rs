use std::sync::Arc;

use super::config::SsoSettings;
use crate::signature::SsoSecret;

/// Shared state for the SSO route handlers.
#[derive(Debug, Clone)]
pub(super) struct SsoState {
    pub(super) secret: Option<SsoSecret>,
    pub(super) settings: Arc<SsoSettings>,
}
