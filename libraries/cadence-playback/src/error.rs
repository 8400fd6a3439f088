//! Error types for playback session control

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal to a session; they reject a single command.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The catalog is empty, so there is no current track
    #[error("No current track")]
    NoCurrentTrack,

    /// No track in the active ordering has this audio locator
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
