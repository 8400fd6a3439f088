//! Cadence Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for Cadence.
//!
//! This crate provides the building blocks shared by the playback controller, the
//! catalog client, and the server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `Catalog`, `TransportEvent`
//! - **Collaborator Traits**: `AudioTransport`, `AnalysisTap`, `SessionStore`, `CatalogSource`
//! - **Error Handling**: `CadenceError`, `TransportError` and the `Result` alias
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Catalog, TrackDescriptor};
//!
//! let catalog = Catalog::new(vec![
//!     TrackDescriptor::new("Morning", "https://cdn.example.com/morning.mp3"),
//!     TrackDescriptor::new("Evening", "https://cdn.example.com/evening.mp3")
//!         .with_artwork("https://cdn.example.com/evening.jpg"),
//! ]);
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.position_of("https://cdn.example.com/evening.mp3"), Some(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod locator;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result, TransportError};
pub use locator::proxied_locator;
pub use traits::{AnalysisTap, AudioTransport, CatalogSource, SessionStore};
pub use types::{Catalog, TrackDescriptor, TransportEvent};
