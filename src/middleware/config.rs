use url::Url;

use crate::config::non_empty_var;
use crate::error::Error;
use crate::signature::SsoSecret;

/// Identity hub origin used when `HUB_BASE_URL` is not set.
pub const HUB_FALLBACK: &str = "https://g-apps-hub.vercel.app";

/// Shared SSO settings used by both config and runtime state.
#[derive(Debug, Clone)]
pub(crate) struct SsoSettings {
    pub(crate) hub_base_url: String,
    pub(crate) secure_cookies: bool,
    pub(crate) sso_path: String,
    pub(crate) login_redirect: String,
    pub(crate) public_prefixes: Vec<String>,
}

impl SsoSettings {
    fn defaults() -> Self {
        Self {
            hub_base_url: HUB_FALLBACK.into(),
            secure_cookies: true,
            sso_path: "/sso".into(),
            login_redirect: "/".into(),
            public_prefixes: vec!["/static/".into(), "/assets/".into(), "/favicon.ico".into()],
        }
    }

    /// Whether `path` bypasses the gate: the SSO entry point and static assets.
    pub(crate) fn is_public(&self, path: &str) -> bool {
        path.starts_with(&self.sso_path)
            || self
                .public_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// SSO and access-gate configuration.
///
/// The secret is optional: without it every token is rejected, but the gate
/// still works.
///
/// Use [`from_env()`](SsoConfig::from_env) for convention-based setup,
/// or [`new()`](SsoConfig::new) with `with_*` methods for full control.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub(crate) secret: Option<SsoSecret>,
    pub(crate) settings: SsoSettings,
}

impl SsoConfig {
    /// Create config with the given secret and defaults for everything else.
    #[must_use]
    pub fn new(secret: Option<SsoSecret>) -> Self {
        Self {
            secret,
            settings: SsoSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `HUB_SSO_SECRET`: HMAC key shared with the identity hub; when unset
    ///   every SSO token is rejected
    /// - `HUB_BASE_URL`: identity hub origin (default [`HUB_FALLBACK`])
    /// - `APP_ENV` or `NODE_ENV`: `production` turns on `Secure` cookies
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `HUB_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, Error> {
        let secret = match non_empty_var("HUB_SSO_SECRET") {
            Some(secret) => Some(SsoSecret::new(secret)?),
            None => {
                tracing::warn!("HUB_SSO_SECRET is not set; all SSO tokens will be rejected");
                None
            }
        };

        let mut config = Self::new(secret);

        if let Some(hub) = non_empty_var("HUB_BASE_URL") {
            let url: Url = hub
                .parse()
                .map_err(|e| Error::Config(format!("HUB_BASE_URL: {e}")))?;
            config = config.with_hub_base_url(url.as_str());
        }

        let production = ["APP_ENV", "NODE_ENV"]
            .iter()
            .any(|key| std::env::var(key).as_deref() == Ok("production"));

        Ok(config.with_secure_cookies(production))
    }

    /// Identity hub origin; a trailing `/` is dropped.
    #[must_use]
    pub fn with_hub_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.settings.hub_base_url = url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_login_redirect(mut self, path: impl Into<String>) -> Self {
        self.settings.login_redirect = path.into();
        self
    }

    /// Replace the static-asset prefixes that bypass the gate.
    #[must_use]
    pub fn with_public_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.settings.public_prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn hub_base_url(&self) -> &str {
        &self.settings.hub_base_url
    }

    #[must_use]
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}
