//! Playback events
//!
//! The controller queues an event whenever observable state changes. Presentation code
//! drains them after each command instead of polling every field.

use crate::types::{OrderingMode, RepeatPolicy};
use serde::{Deserialize, Serialize};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// The current track changed (selection, skip, natural advance, or reordering)
    TrackChanged {
        /// Position in the active ordering
        index: usize,
        /// Audio locator of the new current track
        locator: String,
        /// Display title of the new current track
        title: String,
    },

    /// Intent switched between playing and paused
    StateChanged {
        /// Whether the listener now wants audio to play
        playing: bool,
    },

    /// The current track was rewound to replay it
    TrackRestarted {
        /// Position in the active ordering
        index: usize,
    },

    /// Ordering mode changed
    OrderingChanged {
        /// The new mode
        mode: OrderingMode,
    },

    /// Repeat policy changed
    RepeatChanged {
        /// The new policy
        policy: RepeatPolicy,
    },

    /// Volume changed
    VolumeChanged {
        /// New level in [0, 1]
        level: f32,
    },

    /// Transport reported progress
    Progress {
        /// Elapsed seconds
        elapsed_secs: f64,
        /// Duration in seconds
        duration_secs: f64,
    },

    /// Queue panel opened or closed
    QueueViewChanged {
        /// Whether the panel is open
        open: bool,
    },

    /// Non-fatal problem the listener may want to see
    Notice {
        /// Human-readable message
        message: String,
    },
}
