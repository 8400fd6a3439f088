/// Observations pushed by an audio transport
use crate::error::TransportError;

/// Event reported by the audio transport back to the session
///
/// Times are in seconds, matching what media elements report.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Metadata for the loaded locator is available (duration known)
    MetadataLoaded {
        /// Total duration of the loaded track
        duration_secs: f64,
    },

    /// Elapsed playback time changed
    TimeUpdate {
        /// Current position from the start of the track
        elapsed_secs: f64,
    },

    /// Playback reached the end of the track unassisted
    Ended,

    /// The transport's own volume changed (e.g. system media keys)
    VolumeChanged {
        /// New level in [0, 1]
        level: f32,
    },

    /// A previously issued play request failed after it was accepted
    PlayFailed(TransportError),
}
