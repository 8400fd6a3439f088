//! Playback session
//!
//! Ties the controller to its collaborators: the audio transport, the session store,
//! and the visualizer. Every command goes through the controller first, then a single
//! reconciliation pass brings the transport, the store, and the frame loop in line.

use crate::{
    controller::{clamp_volume, NaturalEnd, PlaybackController},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    persistence::SessionPersistence,
    sync::{DesiredState, TransportSync},
    types::{Command, PlaybackConfig, TransportReport},
    visualizer::{FrequencySnapshot, Visualizer},
};
use cadence_core::{proxied_locator, AudioTransport, Catalog, SessionStore, TransportEvent};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A listener's playback session over one catalog
pub struct PlaybackSession<T: AudioTransport, S: SessionStore> {
    controller: PlaybackController,
    transport: T,
    persistence: SessionPersistence<S>,
    sync: TransportSync,
    visualizer: Visualizer,
    report: TransportReport,
    proxy_base: Option<String>,
    shut_down: bool,
}

impl<T: AudioTransport, S: SessionStore> PlaybackSession<T, S> {
    /// Start a session
    ///
    /// Restores the persisted track and volume, then loads the current track paused.
    pub fn new(catalog: Catalog, transport: T, store: S, config: &PlaybackConfig) -> Self {
        Self::from_controller(PlaybackController::new(catalog, config), transport, store, config)
    }

    /// Start a session around an existing controller
    pub fn from_controller(
        mut controller: PlaybackController,
        transport: T,
        store: S,
        config: &PlaybackConfig,
    ) -> Self {
        let persistence = SessionPersistence::new(store);
        controller.restore(&persistence.load());

        info!(
            tracks = controller.catalog().len(),
            index = controller.current_index(),
            volume = controller.volume(),
            "Playback session started"
        );

        let mut session = Self {
            controller,
            transport,
            persistence,
            sync: TransportSync::new(),
            visualizer: Visualizer::new(config.fft_size),
            report: TransportReport::default(),
            proxy_base: config.proxy_base.clone(),
            shut_down: false,
        };
        session.reconcile();
        session
    }

    // ===== Commands =====

    /// Apply a listener command and reconcile
    ///
    /// # Errors
    /// Returns an error when a selection does not resolve to a track. The session is
    /// unchanged in that case.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        if self.shut_down {
            debug!(?command, "Ignoring command after shutdown");
            return Ok(());
        }

        if let Command::Seek(secs) = command {
            self.seek(secs);
            return Ok(());
        }

        self.controller.apply(&command)?;
        self.reconcile();
        Ok(())
    }

    /// Move the playback position of the current track
    ///
    /// No-op without a current track. Negative or non-finite positions are ignored.
    pub fn seek(&mut self, secs: f64) {
        if self.controller.current_track().is_none() || !secs.is_finite() || secs < 0.0 {
            debug!(secs, "Ignoring seek");
            return;
        }

        let Ok(position) = Duration::try_from_secs_f64(secs) else {
            debug!(secs, "Ignoring seek past the representable range");
            return;
        };

        match self.transport.seek(position) {
            Ok(()) => {
                self.report.elapsed_secs = secs;
                self.controller
                    .push_progress(self.report.elapsed_secs, self.report.duration_secs);
            }
            Err(e) if e.is_superseded() => debug!("Seek superseded by a newer load"),
            Err(e) => {
                warn!(error = %e, "Seek failed");
                self.controller.push_notice(format!("Seek failed: {e}"));
            }
        }
    }

    /// Feed an observation from the transport
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        if self.shut_down {
            return;
        }

        match event {
            TransportEvent::MetadataLoaded { duration_secs } => {
                self.report.duration_secs = finite_or_zero(duration_secs);
                self.controller
                    .push_progress(self.report.elapsed_secs, self.report.duration_secs);
            }
            TransportEvent::TimeUpdate { elapsed_secs } => {
                self.report.elapsed_secs = finite_or_zero(elapsed_secs);
                self.controller
                    .push_progress(self.report.elapsed_secs, self.report.duration_secs);
            }
            TransportEvent::Ended => {
                if self.controller.handle_natural_end() != NaturalEnd::Ignored {
                    self.reconcile();
                }
            }
            TransportEvent::VolumeChanged { level } => {
                let Some(level) = clamp_volume(level) else {
                    debug!(level, "Ignoring non-finite transport volume");
                    return;
                };
                self.sync.note_transport_volume(level);
                self.controller.set_volume(level);
                self.reconcile();
            }
            TransportEvent::PlayFailed(error) => {
                if error.is_superseded() {
                    debug!("Play request superseded by a newer load");
                } else {
                    warn!(error = %error, "Playback failed");
                    self.controller.push_notice(format!("Playback failed: {error}"));
                }
            }
        }
    }

    /// Render one visualizer frame
    ///
    /// Returns `None` while paused or when the transport has no analysis tap.
    pub fn render_frame(&mut self) -> Option<FrequencySnapshot> {
        self.visualizer.frame(self.transport.analysis_tap())
    }

    /// End the session: stop the frame loop and release the transport
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.visualizer.tear_down();
        self.transport.pause();
        self.transport.release();
        info!("Playback session ended");
    }

    // ===== Queries =====

    /// The state machine
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Title of the current track
    ///
    /// # Errors
    /// Returns [`PlaybackError::NoCurrentTrack`] for an empty catalog
    pub fn current_title(&self) -> Result<&str> {
        self.controller
            .current_track()
            .map(|track| track.title.as_str())
            .ok_or(PlaybackError::NoCurrentTrack)
    }

    /// Latest transport observations
    pub fn report(&self) -> TransportReport {
        self.report
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport (for hosts that drive it directly)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The session store
    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// The visualizer
    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Whether [`shutdown`](Self::shutdown) has run
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.controller.drain_events()
    }

    /// Locator handed to the transport for a track
    pub fn transport_locator(&self, audio_locator: &str) -> String {
        match &self.proxy_base {
            Some(base) => proxied_locator(base, audio_locator),
            None => audio_locator.to_string(),
        }
    }

    // ===== Internals =====

    fn reconcile(&mut self) {
        let locator = self
            .controller
            .current_track()
            .map(|track| self.transport_locator(&track.audio_locator));
        let desired = DesiredState {
            locator: locator.as_deref(),
            playing: self.controller.is_playing(),
            volume: self.controller.volume(),
            restart_generation: self.controller.restart_generation(),
        };

        let outcome = self.sync.reconcile(&mut self.transport, &desired);
        if outcome.loaded || outcome.restarted {
            self.report.elapsed_secs = 0.0;
        }
        if outcome.loaded {
            self.report.duration_secs = 0.0;
        }
        if let Some(error) = outcome.failure {
            self.controller.push_notice(format!("Playback failed: {error}"));
        }

        self.visualizer.set_playing(self.controller.is_playing());
        self.persistence.save(&self.controller.snapshot());
    }
}

impl<T: AudioTransport, S: SessionStore> Drop for PlaybackSession<T, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
