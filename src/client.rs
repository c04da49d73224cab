//! REST client for the Immutable X API
//!
//! This module provides an async HTTP client for the Immutable X REST API:
//! - single-record lookups (users, orders, trades, mints, balances)
//! - list endpoints exposed as [`PageSource`]s for the paginator
//! - signed creation requests (projects, collections, metadata, mints)
//! - automatic retry with exponential backoff for idempotent requests

use crate::config::Network;
use crate::paginate::{Page, PageRequest, PageSource};
use crate::signing::{ImxAuth, SigningError, IMX_SIGNATURE_HEADER, IMX_TIMESTAMP_HEADER};
use crate::types::{
    AddMetadataSchemaRequest, CreateCollectionRequest, CreateProjectRequest, ListEnvelope,
    MetadataSchemaUpdate, MintRequest, RegisterUserRequest, SignableRegistration,
    SignableRegistrationRequest,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body, as returned by the API
        body: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout,

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request signing failed
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Base URL cannot be used to address API resources
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Enable automatic retry on failure
    pub enable_retry: bool,
    /// Also retry non-idempotent requests (POST/PATCH)
    pub retry_mutations: bool,
    /// Maximum number of attempts per request
    pub max_retries: u32,
    /// Initial retry delay (exponential backoff)
    pub initial_retry_delay: Duration,
    /// Maximum retry delay
    pub max_retry_delay: Duration,
    /// `page_size` sent to list endpoints; server default when unset
    pub page_size: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Network::default().api_url().to_string(),
            timeout: Duration::from_secs(30),
            enable_retry: true,
            retry_mutations: false,
            max_retries: 3,
            initial_retry_delay: Duration::from_millis(100),
            max_retry_delay: Duration::from_secs(10),
            page_size: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at `network`
    pub fn for_network(network: Network) -> Self {
        Self {
            base_url: network.api_url().to_string(),
            ..Default::default()
        }
    }
}

/// HTTP client for the Immutable X REST API
///
/// # Example
///
/// ```no_run
/// use imx_toolkit::{fetch_all, ImxClient, Network};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ImxClient::new(Network::Sandbox)?;
///
///     let orders = fetch_all(&client.orders(), "created_at").await?;
///     println!("{} orders", orders.len());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ImxClient {
    http: reqwest::Client,
    base: Url,
    config: ClientConfig,
}

impl ImxClient {
    /// Create a client for `network` with default configuration
    pub fn new(network: Network) -> Result<Self> {
        Self::with_config(ClientConfig::for_network(network))
    }

    /// Create a client with custom configuration
    pub fn with_config(mut config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("imx-toolkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url));
        }

        Ok(Self { http, base, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the resource at `segments`, each one percent-encoded
    fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        // cannot-be-a-base URLs are rejected in `with_config`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.http.request(method, url.clone())
    }

    /// Next backoff delay, capped at `max_retry_delay`
    fn backoff(&self, delay: Duration) -> Duration {
        delay.saturating_mul(2).min(self.config.max_retry_delay)
    }

    /// Execute a request, retrying transient failures
    ///
    /// `build` is called once per attempt since a sent request cannot be
    /// reused.
    async fn request_with_retry<T, F>(&self, label: &str, idempotent: bool, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        if !self.config.enable_retry || !(idempotent || self.config.retry_mutations) {
            return Self::execute(build()).await;
        }

        let mut attempt = 0;
        let mut delay = self.config.initial_retry_delay;

        loop {
            match Self::execute(build()).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;

                    if attempt >= self.config.max_retries || !Self::is_retryable_error(&e) {
                        return Err(e);
                    }

                    // Exponential backoff with jitter
                    let jitter = Duration::from_millis(rand::random::<u64>() % 100);
                    let sleep_duration = delay.saturating_add(jitter).min(self.config.max_retry_delay);

                    tracing::warn!(
                        request = label,
                        attempt = attempt,
                        delay_ms = sleep_duration.as_millis() as u64,
                        error = %e,
                        "API request failed, retrying"
                    );

                    sleep(sleep_duration).await;
                    delay = self.backoff(delay);
                }
            }
        }
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(Self::transport_error)?;
        let status = response.status();
        let url = response.url().path().to_string();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        debug!(path = %url, status = status.as_u16(), "API response");
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn transport_error(error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Connection(error.to_string())
        }
    }

    /// Transport failures, rate limiting and server errors are retryable
    fn is_retryable_error(error: &ClientError) -> bool {
        match error {
            ClientError::Connection(_) | ClientError::Timeout => true,
            ClientError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments);
        self.request_with_retry(url.path(), true, || self.request(Method::GET, &url))
            .await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        auth: Option<&ImxAuth>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // Serialize once up front so encoding failures are not retried
        let body =
            serde_json::to_vec(body).map_err(|e| ClientError::Serialization(e.to_string()))?;

        let url = self.endpoint(segments);
        self.request_with_retry(url.path(), false, || {
            let mut request = self
                .request(method.clone(), &url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
            if let Some(auth) = auth {
                request = request
                    .header(IMX_SIGNATURE_HEADER, &auth.signature)
                    .header(IMX_TIMESTAMP_HEADER, &auth.timestamp);
            }
            request
        })
        .await
    }

    /// Get a registered user's details
    pub async fn get_user(&self, address: &str) -> Result<Value> {
        self.get(&["v1", "users", address]).await
    }

    /// Get the messages to sign for an off-chain registration
    pub async fn get_signable_registration(
        &self,
        request: &SignableRegistrationRequest,
    ) -> Result<SignableRegistration> {
        self.send_json(Method::POST, &["v1", "signable-registration-offchain"], request, None)
            .await
    }

    /// Register a user off-chain
    pub async fn register_user(&self, request: &RegisterUserRequest) -> Result<Value> {
        self.send_json(Method::POST, &["v1", "users"], request, None)
            .await
    }

    /// Create a project
    pub async fn create_project(
        &self,
        auth: &ImxAuth,
        request: &CreateProjectRequest,
    ) -> Result<Value> {
        self.send_json(Method::POST, &["v1", "projects"], request, Some(auth))
            .await
    }

    /// Create a collection
    pub async fn create_collection(
        &self,
        auth: &ImxAuth,
        request: &CreateCollectionRequest,
    ) -> Result<Value> {
        self.send_json(Method::POST, &["v1", "collections"], request, Some(auth))
            .await
    }

    /// Add properties to a collection's metadata schema
    pub async fn add_metadata_schema(
        &self,
        auth: &ImxAuth,
        collection_address: &str,
        request: &AddMetadataSchemaRequest,
    ) -> Result<Value> {
        let path = ["v1", "collections", collection_address, "metadata-schema"];
        self.send_json(Method::POST, &path, request, Some(auth))
            .await
    }

    /// Update one property of a collection's metadata schema
    pub async fn update_metadata_schema_by_name(
        &self,
        auth: &ImxAuth,
        collection_address: &str,
        name: &str,
        update: &MetadataSchemaUpdate,
    ) -> Result<Value> {
        let path = ["v1", "collections", collection_address, "metadata-schema", name];
        self.send_json(Method::PATCH, &path, update, Some(auth))
            .await
    }

    /// Submit a signed mint request
    pub async fn mint(&self, request: &MintRequest) -> Result<Value> {
        if request.auth_signature.is_none() {
            return Err(ClientError::Serialization(
                "mint request is missing auth_signature".to_string(),
            ));
        }
        self.send_json(Method::POST, &["v2", "mints"], std::slice::from_ref(request), None)
            .await
    }

    /// Get a mint by ID
    pub async fn get_mint(&self, id: &str) -> Result<Value> {
        self.get(&["v1", "mints", id]).await
    }

    /// Get an order by ID
    pub async fn get_order(&self, id: &str) -> Result<Value> {
        self.get(&["v1", "orders", id]).await
    }

    /// Get a trade by ID
    pub async fn get_trade(&self, id: &str) -> Result<Value> {
        self.get(&["v1", "trades", id]).await
    }

    /// Get an owner's balance of one token
    pub async fn get_balance(&self, owner: &str, token: &str) -> Result<Value> {
        self.get(&["v2", "balances", owner, token]).await
    }

    /// All orders
    pub fn orders(&self) -> ListEndpoint<'_> {
        ListEndpoint::new(self, &["v1", "orders"])
    }

    /// All trades
    pub fn trades(&self) -> ListEndpoint<'_> {
        ListEndpoint::new(self, &["v1", "trades"])
    }

    /// Assets owned by `user`
    pub fn assets(&self, user: &str) -> ListEndpoint<'_> {
        ListEndpoint::new(self, &["v1", "assets"]).with_query("user", user)
    }

    /// Token balances held by `owner`
    pub fn balances(&self, owner: &str) -> ListEndpoint<'_> {
        ListEndpoint::new(self, &["v2", "balances", owner])
    }
}

/// A cursor-paginated list endpoint
#[derive(Debug, Clone)]
pub struct ListEndpoint<'a> {
    client: &'a ImxClient,
    url: Url,
    query: Vec<(&'static str, String)>,
}

impl<'a> ListEndpoint<'a> {
    /// List endpoint at the resource path `segments`
    pub fn new(client: &'a ImxClient, segments: &[&str]) -> Self {
        Self {
            client,
            url: client.endpoint(segments),
            query: Vec::new(),
        }
    }

    /// Add a fixed query parameter sent with every page
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Endpoint path, percent-encoded
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query parameters for one page request
    ///
    /// An empty ordering key is omitted so the server default applies.
    pub fn page_query(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut query = self.query.clone();
        if !request.order_by.is_empty() {
            query.push(("order_by", request.order_by.clone()));
        }
        if let Some(cursor) = &request.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(page_size) = self.client.config.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

#[async_trait]
impl<'a> PageSource for ListEndpoint<'a> {
    type Item = Value;
    type Error = ClientError;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>> {
        let query = self.page_query(request);
        let envelope: ListEnvelope<Value> = self
            .client
            .request_with_retry(self.path(), true, || {
                self.client.request(Method::GET, &self.url).query(&query)
            })
            .await?;
        Ok(envelope.into())
    }
}
