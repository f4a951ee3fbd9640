use std::net::SocketAddr;

use url::Url;

use crate::error::Error;
use crate::middleware::SsoConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Hosted catalog backend coordinates.
#[derive(Clone)]
pub struct CatalogBackendConfig {
    pub url: Url,
    pub anon_key: String,
}

impl std::fmt::Debug for CatalogBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBackendConfig")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub sso: SsoConfig,
    /// `None` runs against the in-memory demo catalog.
    pub catalog: Option<CatalogBackendConfig>,
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// # Optional env vars
    /// - `BIND_ADDR`: listen address (default `0.0.0.0:3000`)
    /// - `SUPABASE_URL` + `SUPABASE_ANON_KEY`: catalog backend; set both or neither
    /// - everything read by [`SsoConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on unparsable values or when only one of the
    /// two catalog variables is set.
    pub fn from_env() -> Result<Self, Error> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| Error::Config(format!("BIND_ADDR: {e}")))?;

        let catalog = match (
            non_empty_var("SUPABASE_URL"),
            non_empty_var("SUPABASE_ANON_KEY"),
        ) {
            (Some(url), Some(anon_key)) => {
                let url: Url = url
                    .parse()
                    .map_err(|e| Error::Config(format!("SUPABASE_URL: {e}")))?;
                Some(CatalogBackendConfig { url, anon_key })
            }
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "SUPABASE_URL and SUPABASE_ANON_KEY must be set together".into(),
                ));
            }
        };

        Ok(Self {
            bind_addr,
            sso: SsoConfig::from_env()?,
            catalog,
        })
    }
}

pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
