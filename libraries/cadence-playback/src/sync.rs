//! Transport synchronization
//!
//! The reconciler is the only code that loads, plays, pauses, or rewinds the
//! transport. It remembers what it last applied so an unchanged intent never reaches
//! the transport twice.

use cadence_core::{AudioTransport, TransportError};
use std::time::Duration;
use tracing::{debug, warn};

/// Intent as the transport should see it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredState<'a> {
    /// Locator to hand to the transport (`None` for an empty catalog)
    pub locator: Option<&'a str>,

    /// Whether audio should be playing
    pub playing: bool,

    /// Output volume in [0, 1]
    pub volume: f32,

    /// Replay generation from the controller
    pub restart_generation: u64,
}

/// What a reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// A new locator was loaded
    pub loaded: bool,

    /// The track was rewound to the start
    pub restarted: bool,

    /// Play was requested and accepted
    pub played: bool,

    /// Pause was requested
    pub paused: bool,

    /// Failure the listener should hear about (superseded requests never appear here)
    pub failure: Option<TransportError>,
}

#[derive(Debug, Clone, PartialEq)]
struct Applied {
    locator: String,
    playing: bool,
    restart_generation: u64,
}

/// Applies intent to a transport
#[derive(Debug, Default)]
pub struct TransportSync {
    applied: Option<Applied>,
    applied_volume: Option<f32>,
}

impl TransportSync {
    /// Create a reconciler that has applied nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a volume the transport reported on its own
    pub fn note_transport_volume(&mut self, level: f32) {
        self.applied_volume = Some(level);
    }

    /// Bring the transport in line with `desired`
    pub fn reconcile<T: AudioTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        desired: &DesiredState<'_>,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        if self.applied_volume != Some(desired.volume) {
            transport.set_volume(desired.volume);
            self.applied_volume = Some(desired.volume);
        }

        let Some(locator) = desired.locator else {
            return report;
        };

        let next = Applied {
            locator: locator.to_string(),
            playing: desired.playing,
            restart_generation: desired.restart_generation,
        };
        let loaded_matches = transport.loaded_locator() == Some(locator);
        if loaded_matches && self.applied.as_ref() == Some(&next) {
            return report;
        }

        if !loaded_matches {
            debug!(locator, "Loading track");
            if let Err(e) = transport.load(locator) {
                // The previous track must not keep sounding under the new intent
                if !e.is_superseded() {
                    transport.pause();
                    report.paused = true;
                }
                Self::record_failure(&mut report, "load", e);
                self.applied = Some(next);
                return report;
            }
            report.loaded = true;
        }

        let restart_requested = self
            .applied
            .as_ref()
            .is_some_and(|applied| applied.restart_generation != desired.restart_generation);
        if restart_requested && !report.loaded {
            match transport.seek(Duration::ZERO) {
                Ok(()) => report.restarted = true,
                Err(e) => Self::record_failure(&mut report, "rewind", e),
            }
        }

        if desired.playing {
            match transport.play() {
                Ok(()) => report.played = true,
                Err(e) => Self::record_failure(&mut report, "play", e),
            }
        } else {
            transport.pause();
            report.paused = true;
        }

        self.applied = Some(next);
        report
    }

    fn record_failure(report: &mut SyncReport, action: &str, error: TransportError) {
        if error.is_superseded() {
            debug!(action, "Transport request superseded by a newer load");
            return;
        }
        warn!(action, error = %error, "Transport request failed");
        report.failure = Some(error);
    }
}
