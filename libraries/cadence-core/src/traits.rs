//! Collaborator traits for Cadence
//!
//! The playback controller never talks to a device, a browser, or the network directly.
//! Platform code provides these seams instead.

use crate::error::{Result, TransportError};
use crate::types::Catalog;
use async_trait::async_trait;
use std::time::Duration;

/// Single streaming audio sink
///
/// Implementers load one locator at a time and report progress through
/// [`TransportEvent`](crate::TransportEvent)s delivered to the session by the host.
pub trait AudioTransport {
    /// Locator currently loaded, if any
    fn loaded_locator(&self) -> Option<&str>;

    /// Replace the loaded locator
    ///
    /// Any in-flight play request for the previous locator is aborted.
    ///
    /// # Errors
    /// Returns an error if the locator cannot be opened
    fn load(&mut self, locator: &str) -> std::result::Result<(), TransportError>;

    /// Start or resume playback of the loaded locator
    ///
    /// # Errors
    /// Returns [`TransportError::Aborted`] when a newer load superseded this request,
    /// or [`TransportError::Failed`] for any other failure
    fn play(&mut self) -> std::result::Result<(), TransportError>;

    /// Pause playback (idempotent)
    fn pause(&mut self);

    /// Whether the transport is currently paused
    fn is_paused(&self) -> bool;

    /// Move the playback position
    ///
    /// # Errors
    /// Returns an error if nothing is loaded or the position is rejected
    fn seek(&mut self, position: Duration) -> std::result::Result<(), TransportError>;

    /// Current output volume in [0, 1]
    fn volume(&self) -> f32;

    /// Set the output volume in [0, 1]
    fn set_volume(&mut self, level: f32);

    /// Live signal tap for analysis
    ///
    /// Returns `None` until the platform has initialised its analysis graph.
    fn analysis_tap(&mut self) -> Option<&mut dyn AnalysisTap> {
        None
    }

    /// Release the underlying audio resource
    fn release(&mut self) {}
}

/// Read access to the transport's live signal
pub trait AnalysisTap {
    /// Sample rate of the tapped signal in Hz
    fn sample_rate(&self) -> u32;

    /// Copy the most recent mono time-domain samples into `buffer`
    ///
    /// Returns the number of samples written (may be less than `buffer.len()`).
    fn read_time_domain(&mut self, buffer: &mut [f32]) -> usize;
}

/// Synchronous string key-value store that survives across sessions
pub trait SessionStore {
    /// Read a value
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Source of the session's catalog
///
/// Implementations must never fail: any upstream problem yields an empty catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the catalog for a new session
    async fn load_catalog(&self) -> Catalog;
}

#[async_trait]
impl CatalogSource for Catalog {
    async fn load_catalog(&self) -> Catalog {
        self.clone()
    }
}
