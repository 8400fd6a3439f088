//! Cadence - Playback Session Control
//!
//! Platform-agnostic playback session logic for Cadence.
//!
//! This crate provides:
//! - Sequential and shuffled orderings over an immutable catalog
//! - Repeat policies (Off, All, One) and natural-end handling
//! - Next/previous skipping with wrap-around
//! - Queue search that resolves selections by track identity
//! - Transport reconciliation (load, play, pause, rewind, volume)
//! - Persistence of the last track and volume
//! - A spectrum visualizer fed from the transport's analysis tap
//!
//! # Architecture
//!
//! `cadence-playback` never talks to an audio device, a browser, or the network:
//! - [`PlaybackController`] is a pure state machine over the listener's intent
//! - [`PlaybackSession`] owns the collaborators and reconciles them after each command
//! - The transport and store are provided by the host through `cadence-core` traits
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Catalog, TrackDescriptor};
//! use cadence_playback::{PlaybackConfig, PlaybackController, RepeatPolicy};
//!
//! let catalog = Catalog::new(vec![
//!     TrackDescriptor::new("Song A", "https://cdn.example.com/a.mp3"),
//!     TrackDescriptor::new("Song B", "https://cdn.example.com/b.mp3"),
//! ]);
//!
//! let mut controller = PlaybackController::new(catalog, &PlaybackConfig::default());
//! controller.next();
//! assert_eq!(controller.current_index(), 1);
//! assert!(controller.is_playing());
//!
//! controller.toggle_repeat();
//! assert_eq!(controller.repeat_policy(), RepeatPolicy::All);
//! ```

mod controller;
mod error;
mod events;
pub mod ordering;
pub mod persistence;
pub mod search;
mod session;
pub mod shortcuts;
pub mod sync;
mod time;
pub mod types;
pub mod visualizer;

// Public exports
pub use controller::{NaturalEnd, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use persistence::{JsonFileSessionStore, MemorySessionStore, SessionPersistence};
pub use search::QueueEntry;
pub use session::PlaybackSession;
pub use shortcuts::command_for_key;
pub use time::format_time;
pub use types::{
    Command, OrderingMode, PlaybackConfig, PlaybackIntent, QueueView, RepeatPolicy,
    SessionSnapshot, TransportReport, DEFAULT_VOLUME,
};
pub use visualizer::{FrameLoopState, FrequencySnapshot};
