//! Async service clients.
//!
//! The session talks to remote services through the `FeatureService` and
//! `Geocoder` traits so tests can substitute in-memory implementations.
//! Methods return boxed futures for dyn-compatibility.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::geocode::{Place, PlaceSearch, parse_places};
use crate::wfs::GetFeature;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait FeatureService: Send + Sync {
    /// Issues `request` and returns the raw response body.
    ///
    /// The body is returned whatever the HTTP status: GeoServer reports
    /// request errors as XML exception documents. `Err` means the service
    /// could not be reached or the body could not be read.
    fn get_feature(&self, request: &GetFeature) -> BoxFuture<'_, Result<String, ServiceError>>;

    /// URL a browser can use to fetch `request` directly.
    fn request_url(&self, request: &GetFeature) -> String;
}

pub trait Geocoder: Send + Sync {
    fn search(&self, search: &PlaceSearch) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>>;
}

/// Shared reqwest client with the viewer's user agent and timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .user_agent(concat!("gsn-viewer/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::with_source("failed to build HTTP client", e))
}

/// WFS endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFeatureService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFeatureService {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FeatureService for HttpFeatureService {
    fn get_feature(&self, request: &GetFeature) -> BoxFuture<'_, Result<String, ServiceError>> {
        let url = request.url(&self.base_url);
        Box::pin(async move {
            debug!("wfs GetFeature {url}");
            let resp = self.http.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                warn!("wfs GetFeature returned {status}");
            }
            Ok(resp.text().await?)
        })
    }

    fn request_url(&self, request: &GetFeature) -> String {
        request.url(&self.base_url)
    }
}

/// Nominatim-compatible geocoder.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    http: reqwest::Client,
    search_url: String,
}

impl HttpGeocoder {
    pub fn new(http: reqwest::Client, search_url: impl Into<String>) -> Self {
        Self {
            http,
            search_url: search_url.into(),
        }
    }
}

impl Geocoder for HttpGeocoder {
    fn search(&self, search: &PlaceSearch) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>> {
        let params = search.params();
        Box::pin(async move {
            let resp = self
                .http
                .get(&self.search_url)
                .query(&params)
                .send()
                .await?
                .error_for_status()?;
            let body = resp.text().await?;
            parse_places(&body)
                .map_err(|e| ServiceError::with_source("unreadable geocoder response", e))
        })
    }
}
