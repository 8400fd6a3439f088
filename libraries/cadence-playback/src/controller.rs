//! Playback controller - the session's state machine
//!
//! Owns the catalog, the active ordering, the repeat policy, and the listener's
//! intent. It never touches the transport; [`crate::PlaybackSession`] reconciles the
//! transport with the intent after every command.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    ordering::{ActiveOrdering, ShuffledOrder},
    search::{filter_queue, QueueEntry},
    types::{
        Command, OrderingMode, PlaybackConfig, PlaybackIntent, QueueView, RepeatPolicy,
        SessionSnapshot,
    },
};
use cadence_core::{Catalog, TrackDescriptor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// What the controller did when the current track ended on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalEnd {
    /// Repeat-one rewound the current track
    Restarted,
    /// Moved to this position in the active ordering
    Advanced(usize),
    /// Reached the end with repeat off; playback stopped
    Stopped,
    /// Empty catalog, nothing to do
    Ignored,
}

/// Observable state captured before a command, diffed afterwards to emit events
struct Observed {
    index: usize,
    locator: Option<String>,
    playing: bool,
    volume: f32,
    mode: OrderingMode,
    repeat: RepeatPolicy,
    queue_open: bool,
}

/// Playback state machine
pub struct PlaybackController {
    catalog: Catalog,
    shuffled: Option<ShuffledOrder>,
    repeat: RepeatPolicy,
    intent: PlaybackIntent,
    queue_view: QueueView,

    // Bumped whenever the current track must be replayed from the start
    restart_generation: u64,

    // Level to restore when unmuting
    unmuted_volume: Option<f32>,

    default_volume: f32,
    autoplay_on_shuffle: bool,
    rng: StdRng,

    // Event queue for presentation
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Create a controller for a catalog
    pub fn new(catalog: Catalog, config: &PlaybackConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }

    /// Create a controller with a deterministic shuffle
    pub fn with_seed(catalog: Catalog, config: &PlaybackConfig, seed: u64) -> Self {
        Self::with_rng(catalog, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, config: &PlaybackConfig, rng: StdRng) -> Self {
        let default_volume = clamp_volume(config.default_volume).unwrap_or(crate::DEFAULT_VOLUME);
        Self {
            catalog,
            shuffled: None,
            repeat: RepeatPolicy::Off,
            intent: PlaybackIntent {
                volume: default_volume,
                ..PlaybackIntent::default()
            },
            queue_view: QueueView::default(),
            restart_generation: 0,
            unmuted_volume: None,
            default_volume,
            autoplay_on_shuffle: config.autoplay_on_shuffle,
            rng,
            pending_events: Vec::new(),
        }
    }

    /// Seed the intent from persisted state
    ///
    /// An index outside the catalog is ignored; a volume is clamped to [0, 1].
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        if let Some(index) = snapshot.last_track_index {
            if index < self.catalog.len() {
                self.intent.current_index = index;
            } else {
                debug!(
                    index,
                    tracks = self.catalog.len(),
                    "Ignoring persisted track index outside the catalog"
                );
            }
        }

        if let Some(volume) = snapshot.volume.and_then(clamp_volume) {
            self.intent.volume = volume;
        }
    }

    // ===== Queries =====

    /// The session's catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The catalog in the active ordering
    pub fn ordering(&self) -> ActiveOrdering<'_> {
        ActiveOrdering::new(&self.catalog, self.shuffled.as_ref())
    }

    /// Active ordering mode
    pub fn ordering_mode(&self) -> OrderingMode {
        self.ordering().mode()
    }

    /// Permutation backing the shuffled ordering, if shuffle is on
    pub fn shuffled_order(&self) -> Option<&ShuffledOrder> {
        self.shuffled.as_ref()
    }

    /// Current repeat policy
    pub fn repeat_policy(&self) -> RepeatPolicy {
        self.repeat
    }

    /// Current intent
    pub fn intent(&self) -> PlaybackIntent {
        self.intent
    }

    /// Position of the current track in the active ordering
    pub fn current_index(&self) -> usize {
        self.intent.current_index
    }

    /// Current track (`None` only for an empty catalog)
    pub fn current_track(&self) -> Option<&TrackDescriptor> {
        self.ordering().get(self.intent.current_index)
    }

    /// Whether the listener wants audio to play
    pub fn is_playing(&self) -> bool {
        self.intent.is_playing
    }

    /// Desired volume in [0, 1]
    pub fn volume(&self) -> f32 {
        self.intent.volume
    }

    /// Whether the volume is at zero
    pub fn is_muted(&self) -> bool {
        self.intent.volume == 0.0
    }

    /// Counter bumped every time the current track should replay from the start
    pub fn restart_generation(&self) -> u64 {
        self.restart_generation
    }

    /// Queue panel state
    pub fn queue_view(&self) -> &QueueView {
        &self.queue_view
    }

    /// Active ordering filtered by the current search term
    pub fn filtered_queue(&self) -> Vec<QueueEntry<'_>> {
        filter_queue(
            self.ordering(),
            &self.queue_view.search_term,
            self.intent.current_index,
        )
    }

    /// State to persist
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            last_track_index: Some(self.intent.current_index),
            volume: Some(self.intent.volume),
        }
    }

    // ===== Commands =====

    /// Apply a listener command
    ///
    /// Seeking is a transport concern and is a no-op here.
    ///
    /// # Errors
    /// Returns an error when a selection does not resolve to a track
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::ToggleShuffle => self.toggle_shuffle(),
            Command::ToggleRepeat => self.toggle_repeat(),
            Command::SelectTrack { locator } => return self.select_track(locator),
            Command::SelectFiltered { position } => return self.select_filtered(*position),
            Command::SetVolume(level) => self.set_volume(*level),
            Command::ToggleMute => self.toggle_mute(),
            Command::Seek(_) => {}
            Command::SetSearchTerm(term) => self.set_search_term(term.clone()),
            Command::ToggleQueueView => self.toggle_queue_view(),
            Command::CloseQueueView => self.close_queue_view(),
        }
        Ok(())
    }

    /// Flip between playing and paused
    pub fn toggle_play_pause(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        let before = self.observe();
        self.intent.is_playing = !self.intent.is_playing;
        self.emit_changes(&before);
    }

    /// Skip to the next track in the active ordering, wrapping at the end
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        self.skip_to((self.intent.current_index + 1) % len);
    }

    /// Skip to the previous track in the active ordering, wrapping at the start
    pub fn previous(&mut self) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        self.skip_to((self.intent.current_index + len - 1) % len);
    }

    /// Switch between sequential and shuffled ordering
    ///
    /// Turning shuffle on computes a fresh permutation and starts from its first
    /// entry. Turning it off keeps the same track current at its native position.
    pub fn toggle_shuffle(&mut self) {
        let before = self.observe();

        if self.shuffled.is_some() {
            self.shuffled = None;
            let native = before
                .locator
                .as_deref()
                .and_then(|locator| self.catalog.position_of(locator));
            if let Some(index) = native {
                self.intent.current_index = index;
            }
        } else {
            let order = ShuffledOrder::generate(self.catalog.len(), &mut self.rng);
            debug!(tracks = order.len(), "Shuffled catalog");
            self.shuffled = Some(order);
            self.intent.current_index = 0;
            if self.autoplay_on_shuffle && !self.catalog.is_empty() {
                self.intent.is_playing = true;
            }
        }

        self.emit_changes(&before);
    }

    /// Advance the repeat policy Off → All → One → Off
    pub fn toggle_repeat(&mut self) {
        let before = self.observe();
        self.repeat = self.repeat.cycled();
        self.emit_changes(&before);
    }

    /// Make the track with this audio locator current and start playing
    ///
    /// Closes the queue panel.
    ///
    /// # Errors
    /// Returns [`PlaybackError::TrackNotFound`] if no track in the active ordering has
    /// this locator
    pub fn select_track(&mut self, locator: &str) -> Result<()> {
        let index = self
            .ordering()
            .position_of(locator)
            .ok_or_else(|| PlaybackError::TrackNotFound(locator.to_string()))?;

        let before = self.observe();
        self.intent.current_index = index;
        self.intent.is_playing = true;
        self.queue_view.open = false;
        self.emit_changes(&before);
        Ok(())
    }

    /// Select the entry at `position` of the filtered queue
    ///
    /// # Errors
    /// Returns [`PlaybackError::IndexOutOfBounds`] if the filtered queue is shorter
    pub fn select_filtered(&mut self, position: usize) -> Result<()> {
        let locator = self
            .filtered_queue()
            .get(position)
            .map(|entry| entry.track.audio_locator.clone())
            .ok_or(PlaybackError::IndexOutOfBounds(position))?;
        self.select_track(&locator)
    }

    /// Set the desired volume, clamped to [0, 1]
    ///
    /// Non-finite levels are ignored.
    pub fn set_volume(&mut self, level: f32) {
        let Some(level) = clamp_volume(level) else {
            debug!(level, "Ignoring non-finite volume");
            return;
        };
        let before = self.observe();
        self.intent.volume = level;
        self.emit_changes(&before);
    }

    /// Mute, or restore the level in effect before muting
    pub fn toggle_mute(&mut self) {
        let before = self.observe();
        if self.intent.volume > 0.0 {
            self.unmuted_volume = Some(self.intent.volume);
            self.intent.volume = 0.0;
        } else {
            self.intent.volume = self
                .unmuted_volume
                .take()
                .filter(|level| *level > 0.0)
                .unwrap_or(self.default_volume);
        }
        self.emit_changes(&before);
    }

    /// Update the queue search term
    pub fn set_search_term(&mut self, term: String) {
        self.queue_view.search_term = term;
    }

    /// Open or close the queue panel
    pub fn toggle_queue_view(&mut self) {
        let before = self.observe();
        self.queue_view.open = !self.queue_view.open;
        self.emit_changes(&before);
    }

    /// Close the queue panel
    pub fn close_queue_view(&mut self) {
        let before = self.observe();
        self.queue_view.open = false;
        self.emit_changes(&before);
    }

    /// React to the current track ending on its own
    pub fn handle_natural_end(&mut self) -> NaturalEnd {
        let len = self.catalog.len();
        if len == 0 {
            return NaturalEnd::Ignored;
        }

        let outcome = match self.repeat {
            RepeatPolicy::One => {
                self.restart();
                NaturalEnd::Restarted
            }
            _ if self.intent.current_index + 1 < len => {
                let index = self.intent.current_index + 1;
                self.skip_to(index);
                NaturalEnd::Advanced(index)
            }
            RepeatPolicy::All => {
                self.skip_to(0);
                NaturalEnd::Advanced(0)
            }
            RepeatPolicy::Off => {
                let before = self.observe();
                self.intent.is_playing = false;
                self.emit_changes(&before);
                NaturalEnd::Stopped
            }
        };

        debug!(?outcome, repeat = ?self.repeat, "Track ended");
        outcome
    }

    /// Queue a notice for presentation
    pub fn push_notice(&mut self, message: impl Into<String>) {
        self.pending_events.push(PlaybackEvent::Notice {
            message: message.into(),
        });
    }

    /// Queue a progress report for presentation
    pub fn push_progress(&mut self, elapsed_secs: f64, duration_secs: f64) {
        self.pending_events.push(PlaybackEvent::Progress {
            elapsed_secs,
            duration_secs,
        });
    }

    // ===== Events =====

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Move to `index` and play; landing on the same track replays it
    fn skip_to(&mut self, index: usize) {
        if index == self.intent.current_index {
            self.restart();
            return;
        }
        let before = self.observe();
        self.intent.current_index = index;
        self.intent.is_playing = true;
        self.emit_changes(&before);
    }

    fn restart(&mut self) {
        let before = self.observe();
        self.restart_generation = self.restart_generation.wrapping_add(1);
        self.intent.is_playing = true;
        self.pending_events.push(PlaybackEvent::TrackRestarted {
            index: self.intent.current_index,
        });
        self.emit_changes(&before);
    }

    fn observe(&self) -> Observed {
        Observed {
            index: self.intent.current_index,
            locator: self.current_track().map(|t| t.audio_locator.clone()),
            playing: self.intent.is_playing,
            volume: self.intent.volume,
            mode: self.ordering_mode(),
            repeat: self.repeat,
            queue_open: self.queue_view.open,
        }
    }

    fn emit_changes(&mut self, before: &Observed) {
        let mut events = Vec::new();

        if before.mode != self.ordering_mode() {
            events.push(PlaybackEvent::OrderingChanged {
                mode: self.ordering_mode(),
            });
        }
        if let Some(track) = self.current_track() {
            if before.index != self.intent.current_index
                || before.locator.as_deref() != Some(track.audio_locator.as_str())
            {
                events.push(PlaybackEvent::TrackChanged {
                    index: self.intent.current_index,
                    locator: track.audio_locator.clone(),
                    title: track.title.clone(),
                });
            }
        }
        if before.playing != self.intent.is_playing {
            events.push(PlaybackEvent::StateChanged {
                playing: self.intent.is_playing,
            });
        }
        if before.volume != self.intent.volume {
            events.push(PlaybackEvent::VolumeChanged {
                level: self.intent.volume,
            });
        }
        if before.repeat != self.repeat {
            events.push(PlaybackEvent::RepeatChanged {
                policy: self.repeat,
            });
        }
        if before.queue_open != self.queue_view.open {
            events.push(PlaybackEvent::QueueViewChanged {
                open: self.queue_view.open,
            });
        }

        self.pending_events.extend(events);
    }
}

/// Clamp a volume level to [0, 1], rejecting NaN and infinities
pub(crate) fn clamp_volume(level: f32) -> Option<f32> {
    level.is_finite().then(|| level.clamp(0.0, 1.0))
}
