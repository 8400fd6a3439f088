//! Core types for playback session control

use serde::{Deserialize, Serialize};

/// Default volume for a fresh session
pub const DEFAULT_VOLUME: f32 = 0.75;

/// Default analyser FFT size (yields 128 frequency bins)
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Order in which the catalog is traversed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingMode {
    /// Catalog's native order
    #[default]
    Sequential,

    /// A random permutation computed when shuffle was switched on
    Shuffled,
}

/// What happens when a track ends on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatPolicy {
    /// Stop after the last track of the active ordering
    #[default]
    Off,

    /// Wrap around to the first track
    All,

    /// Replay the current track
    One,
}

impl RepeatPolicy {
    /// Next policy in the cycle Off → All → One → Off
    pub fn cycled(self) -> Self {
        match self {
            RepeatPolicy::Off => RepeatPolicy::All,
            RepeatPolicy::All => RepeatPolicy::One,
            RepeatPolicy::One => RepeatPolicy::Off,
        }
    }
}

/// Desired playback state, as opposed to what the transport currently reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackIntent {
    /// Index into the active ordering
    pub current_index: usize,

    /// Whether the listener wants audio to play
    pub is_playing: bool,

    /// Output volume in [0, 1]
    pub volume: f32,
}

impl Default for PlaybackIntent {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

/// Latest observations pushed by the transport (presentation only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportReport {
    /// Elapsed seconds in the current track
    pub elapsed_secs: f64,

    /// Total duration in seconds (0 until metadata is loaded)
    pub duration_secs: f64,
}

/// Persisted slice of the session
///
/// Fields are optional because a store may hold neither, either, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Index of the last selected track
    pub last_track_index: Option<usize>,

    /// Last volume level
    pub volume: Option<f32>,
}

/// State of the queue panel and its search box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueView {
    /// Whether the queue panel is open
    pub open: bool,

    /// Current search term (empty matches everything)
    pub search_term: String,
}

/// Listener command, the only way presentation code changes intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Flip play/pause
    TogglePlayPause,
    /// Skip forward, wrapping
    Next,
    /// Skip backward, wrapping
    Previous,
    /// Switch between sequential and shuffled order
    ToggleShuffle,
    /// Advance the repeat policy
    ToggleRepeat,
    /// Select a track by audio locator
    SelectTrack { locator: String },
    /// Select the n-th entry of the filtered queue
    SelectFiltered { position: usize },
    /// Set volume in [0, 1]
    SetVolume(f32),
    /// Mute or restore the previous volume
    ToggleMute,
    /// Seek to a position in seconds
    Seek(f64),
    /// Update the queue search term
    SetSearchTerm(String),
    /// Open or close the queue panel
    ToggleQueueView,
    /// Close the queue panel
    CloseQueueView,
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume used when nothing is persisted (default: 0.75)
    pub default_volume: f32,

    /// Origin of the audio relay; `None` hands upstream locators to the transport as-is
    pub proxy_base: Option<String>,

    /// Start playing as soon as shuffle is switched on (default: true)
    pub autoplay_on_shuffle: bool,

    /// Analyser FFT size, a power of two (default: 256)
    pub fft_size: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            proxy_base: None,
            autoplay_on_shuffle: true,
            fft_size: DEFAULT_FFT_SIZE,
        }
    }
}
