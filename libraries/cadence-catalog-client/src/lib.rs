//! Cadence Catalog Client
//!
//! HTTP client for the catalog endpoint of a Cadence server (`GET /api/musics`).
//!
//! A session must always start, so [`CatalogClient::fetch_catalog`] never fails: any
//! network, status, or parse problem is logged and yields an empty catalog. Use
//! [`CatalogClient::try_fetch`] when the cause matters.
//!
//! # Example
//!
//! ```ignore
//! use cadence_catalog_client::{CatalogClient, CatalogClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogClientConfig::new("http://localhost:8080"))?;
//!
//!     let catalog = client.fetch_catalog().await;
//!     println!("Found {} tracks", catalog.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;

pub use client::{CatalogClient, CatalogClientConfig, CATALOG_PATH};
pub use error::{CatalogClientError, Result};
