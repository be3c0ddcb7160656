//! REST list client

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use url::Url;

use super::hal;
use super::ResourceClient;
use crate::builder::Missing;
use crate::builder::Set;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::PageResult;
use crate::query::ListQuery;

/// Resource client for HAL-style REST list endpoints.
///
/// A list of `resource_key` is fetched with `GET {base_url}/{resource_key}`
/// (or a per-resource endpoint override) carrying the query as URL
/// parameters. Rows are read from `_embedded.{resource_key}` and the page
/// count from `pages`.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::RestResourceClient;
///
/// let client = RestResourceClient::builder()
///     .base_url("https://cms.example.com/admin/api")
///     .endpoint("snippets", "https://cms.example.com/admin/api/snippet-list")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct RestResourceClient {
    inner: Arc<RestClientInner>,
}

#[derive(Debug)]
struct RestClientInner {
    base_url: String,
    endpoints: HashMap<String, String>,
    http_client: Client,
    timeout: Option<Duration>,
    limit: Option<u32>,
}

impl RestResourceClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> RestResourceClientBuilder<Missing> {
        RestResourceClientBuilder::new()
    }

    /// Returns the base URL list endpoints are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the endpoint serving lists of `resource_key`.
    pub fn endpoint(&self, resource_key: &str) -> String {
        match self.inner.endpoints.get(resource_key) {
            Some(endpoint) => endpoint.clone(),
            None => format!("{}/{}", self.inner.base_url.trim_end_matches('/'), resource_key),
        }
    }

    /// Builds the full request URL for a list query.
    pub fn request_url(&self, resource_key: &str, query: &ListQuery) -> Result<Url, ApiError> {
        let endpoint = self.endpoint(resource_key);
        let mut url =
            Url::parse(&endpoint).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        let mut pairs = query.to_pairs();
        if let Some(limit) = self.inner.limit
            && !query.contains("limit")
        {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Fetches one list page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] for non-success statuses,
    /// [`ApiError::Timeout`] when the configured timeout elapses,
    /// [`ApiError::Network`] for other transport failures and
    /// [`ApiError::Parse`] for bodies that are not a list envelope.
    pub async fn fetch_list(&self, resource_key: &str, query: &ListQuery) -> Result<PageResult, Error> {
        let url = self.request_url(resource_key, query)?;
        log::debug!("GET {}", url);

        let mut request = self
            .inner
            .http_client
            .get(url)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body).into());
        }

        Ok(hal::parse_list(resource_key, &body)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }
}

impl ResourceClient for RestResourceClient {
    fn get_list(
        &self,
        resource_key: &str,
        query: &ListQuery,
    ) -> BoxFuture<'static, Result<PageResult, Error>> {
        let client = self.clone();
        let resource_key = resource_key.to_string();
        let query = query.clone();
        async move { client.fetch_list(&resource_key, &query).await }.boxed()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Builder for constructing a [`RestResourceClient`].
///
/// Uses the typestate pattern to ensure the base URL is set at compile time.
pub struct RestResourceClientBuilder<BaseUrl> {
    base_url: BaseUrl,
    endpoints: HashMap<String, String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    limit: Option<u32>,
    http_client: Option<Client>,
}

impl RestResourceClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            endpoints: HashMap::new(),
            timeout: None,
            connect_timeout: None,
            limit: None,
            http_client: None,
        }
    }

    /// Sets the base URL list endpoints are resolved against.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .base_url("https://cms.example.com/admin/api")
    /// ```
    pub fn base_url(self, url: impl Into<String>) -> RestResourceClientBuilder<Set<String>> {
        RestResourceClientBuilder {
            base_url: Set(url.into()),
            endpoints: self.endpoints,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            limit: self.limit,
            http_client: self.http_client,
        }
    }
}

impl Default for RestResourceClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> RestResourceClientBuilder<B> {
    /// Serves lists of `resource_key` from `url` instead of `{base_url}/{resource_key}`.
    pub fn endpoint(mut self, resource_key: impl Into<String>, url: impl Into<String>) -> Self {
        self.endpoints.insert(resource_key.into(), url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client, so it is ignored when a
    /// custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the page size sent as `limit` with every request.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets a custom HTTP client (e.g. one with default auth headers).
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl RestResourceClientBuilder<Set<String>> {
    /// Builds the [`RestResourceClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL does not parse and
    /// [`ApiError::Network`] if the default HTTP client cannot be created.
    pub fn build(self) -> Result<RestResourceClient, ApiError> {
        let base_url = self.base_url.0;
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RestResourceClient {
            inner: Arc::new(RestClientInner {
                base_url,
                endpoints: self.endpoints,
                http_client,
                timeout: self.timeout,
                limit: self.limit,
            }),
        })
    }
}
