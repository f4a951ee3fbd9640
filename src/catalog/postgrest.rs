use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use url::Url;

use super::record::{ConfigurationItemInput, ConfigurationItemRecord};
use super::store::CatalogStore;
use crate::config::CatalogBackendConfig;
use crate::error::Error;
use crate::types::ItemId;

const TABLE_PATH: &str = "rest/v1/configuration_items";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Catalog backed by a hosted PostgREST (Supabase) table.
///
/// Build once at startup and hand it to the router; the inner
/// `reqwest::Client` pools connections across requests.
#[derive(Clone)]
pub struct PostgrestCatalog {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
}

impl PostgrestCatalog {
    /// Create a client for `<config.url>/rest/v1/configuration_items`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the table URL cannot be formed.
    pub fn new(config: &CatalogBackendConfig) -> Result<Self, Error> {
        let base = config.url.as_str().trim_end_matches('/');
        let endpoint: Url = format!("{base}/{TABLE_PATH}")
            .parse()
            .map_err(|e| Error::Config(format!("SUPABASE_URL: {e}")))?;

        Ok(Self {
            endpoint,
            api_key: config.anon_key.clone(),
            http: reqwest::Client::new(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn row_url(&self, id: &ItemId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        url
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::Backend {
            operation,
            status,
            detail,
        })
    }
}

impl std::fmt::Debug for PostgrestCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestCatalog")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogStore for PostgrestCatalog {
    async fn list_raw(&self) -> Result<Vec<ConfigurationItemRecord>, Error> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "commission.asc");

        let response = self.request(Method::GET, url).send().await?;
        let response = Self::ensure_success(response, "list").await?;
        Ok(response.json().await?)
    }

    async fn create(
        &self,
        input: ConfigurationItemInput,
    ) -> Result<ConfigurationItemRecord, Error> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .json(&input)
            .send()
            .await?;
        let response = Self::ensure_success(response, "create").await?;
        Ok(response.json().await?)
    }

    async fn update(
        &self,
        id: &ItemId,
        input: ConfigurationItemInput,
    ) -> Result<ConfigurationItemRecord, Error> {
        let mut url = self.row_url(id);
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .json(&input)
            .send()
            .await?;
        // PostgREST answers 406 when a single-object request matched no row.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(Error::NotFound(id.clone()));
        }
        let response = Self::ensure_success(response, "update").await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &ItemId) -> Result<(), Error> {
        let response = self
            .request(Method::DELETE, self.row_url(id))
            .send()
            .await?;
        Self::ensure_success(response, "delete").await?;
        Ok(())
    }
}
