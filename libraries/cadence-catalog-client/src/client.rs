//! Catalog client.

use crate::error::{CatalogClientError, Result};
use async_trait::async_trait;
use cadence_core::{Catalog, CatalogSource, TrackDescriptor};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the catalog endpoint on a Cadence server
pub const CATALOG_PATH: &str = "/api/musics";

/// Connection settings for [`CatalogClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogClientConfig {
    /// Server origin, e.g. `http://localhost:8080`
    pub url: String,

    /// Whole-request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,
}

impl CatalogClientConfig {
    /// Config for a server origin with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Client for a Cadence server's catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = config.url.trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let endpoint = Url::parse(&format!("{base}{CATALOG_PATH}"))
            .map_err(|e| CatalogClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Full URL of the catalog endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetch the catalog, falling back to an empty one on any failure.
    pub async fn fetch_catalog(&self) -> Catalog {
        match self.try_fetch().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(url = %self.endpoint, error = %e, "Catalog unavailable, starting empty");
                Catalog::empty()
            }
        }
    }

    /// Fetch the catalog, reporting why it could not be loaded.
    ///
    /// Entries that do not look like track descriptors are skipped.
    pub async fn try_fetch(&self) -> Result<Catalog> {
        debug!(url = %self.endpoint, "Fetching catalog");

        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CatalogClientError::ServerUnreachable(e.to_string())
                } else {
                    CatalogClientError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            CatalogClientError::ParseError(format!("Failed to parse catalog: {e}"))
        })?;
        let catalog = parse_catalog(body)?;

        info!(tracks = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn load_catalog(&self) -> Catalog {
        self.fetch_catalog().await
    }
}

fn parse_catalog(body: Value) -> Result<Catalog> {
    let Value::Array(entries) = body else {
        return Err(CatalogClientError::ParseError(
            "expected a JSON array of tracks".into(),
        ));
    };

    let total = entries.len();
    let tracks: Vec<TrackDescriptor> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(track) => Some(track),
            Err(e) => {
                warn!(error = %e, "Skipping malformed catalog entry");
                None
            }
        })
        .collect();

    if tracks.len() < total {
        debug!(kept = tracks.len(), total, "Dropped malformed catalog entries");
    }
    Ok(Catalog::new(tracks))
}
