//! Integration tests for PlaybackSession
//!
//! Drives a full session against a recording transport and an in-memory store, the
//! way a host would wire it up.

use cadence_core::{
    AnalysisTap, AudioTransport, Catalog, SessionStore, TrackDescriptor, TransportError,
    TransportEvent,
};
use cadence_playback::persistence::{LAST_TRACK_INDEX_KEY, VOLUME_KEY};
use cadence_playback::{
    Command, FrameLoopState, MemorySessionStore, OrderingMode, PlaybackConfig, PlaybackController,
    PlaybackError, PlaybackEvent, PlaybackSession, RepeatPolicy,
};
use std::time::Duration;

// ===== Fakes =====

struct ToneTap;

impl AnalysisTap for ToneTap {
    fn sample_rate(&self) -> u32 {
        44_100
    }

    fn read_time_domain(&mut self, buffer: &mut [f32]) -> usize {
        for (n, sample) in buffer.iter_mut().enumerate() {
            *sample = if n % 2 == 0 { 0.25 } else { -0.25 };
        }
        buffer.len()
    }
}

#[derive(Default)]
struct FakeTransport {
    loaded: Option<String>,
    playing: bool,
    volume: f32,
    loads: Vec<String>,
    plays: usize,
    seeks: Vec<Duration>,
    fail_next_play: Option<TransportError>,
    released: bool,
    tap: Option<ToneTap>,
}

impl AudioTransport for FakeTransport {
    fn loaded_locator(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    fn load(&mut self, locator: &str) -> Result<(), TransportError> {
        self.loads.push(locator.to_string());
        self.loaded = Some(locator.to_string());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.plays += 1;
        if let Some(error) = self.fail_next_play.take() {
            return Err(error);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn seek(&mut self, position: Duration) -> Result<(), TransportError> {
        if self.loaded.is_none() {
            return Err(TransportError::failed("nothing loaded"));
        }
        self.seeks.push(position);
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
    }

    fn analysis_tap(&mut self) -> Option<&mut dyn AnalysisTap> {
        self.tap.as_mut().map(|tap| tap as &mut dyn AnalysisTap)
    }

    fn release(&mut self) {
        self.released = true;
    }
}

// ===== Helpers =====

fn catalog(n: usize) -> Catalog {
    Catalog::new(
        (0..n)
            .map(|i| TrackDescriptor::new(format!("Track {i}"), format!("t{i}.mp3")))
            .collect(),
    )
}

fn session(n: usize) -> PlaybackSession<FakeTransport, MemorySessionStore> {
    session_with_store(n, MemorySessionStore::new())
}

fn session_with_store(
    n: usize,
    store: MemorySessionStore,
) -> PlaybackSession<FakeTransport, MemorySessionStore> {
    let config = PlaybackConfig::default();
    let controller = PlaybackController::with_seed(catalog(n), &config, 42);
    PlaybackSession::from_controller(controller, FakeTransport::default(), store, &config)
}

fn stored(
    session: &PlaybackSession<FakeTransport, MemorySessionStore>,
    key: &str,
) -> Option<String> {
    session.store().get(key).unwrap()
}

// ===== Startup =====

#[test]
fn startup_loads_first_track_paused() {
    let s = session(3);

    assert_eq!(s.transport().loads, vec!["t0.mp3"]);
    assert!(s.transport().is_paused());
    assert_eq!(s.transport().volume(), 0.75);
    assert_eq!(stored(&s, LAST_TRACK_INDEX_KEY).as_deref(), Some("0"));
    assert_eq!(stored(&s, VOLUME_KEY).as_deref(), Some("0.75"));
}

#[test]
fn startup_restores_persisted_track_and_volume() {
    let mut store = MemorySessionStore::new();
    store.set(LAST_TRACK_INDEX_KEY, "2").unwrap();
    store.set(VOLUME_KEY, "0.3").unwrap();

    let s = session_with_store(3, store);

    assert_eq!(s.controller().current_index(), 2);
    assert!(!s.controller().is_playing());
    assert_eq!(s.transport().loaded_locator(), Some("t2.mp3"));
    assert!(s.transport().is_paused());
    assert_eq!(s.transport().volume(), 0.3);
}

#[test]
fn startup_ignores_out_of_range_index() {
    let mut store = MemorySessionStore::new();
    store.set(LAST_TRACK_INDEX_KEY, "9").unwrap();

    let s = session_with_store(3, store);

    assert_eq!(s.controller().current_index(), 0);
    assert_eq!(s.transport().loaded_locator(), Some("t0.mp3"));
}

// ===== Navigation =====

#[test]
fn next_from_first_track_plays_second() {
    let mut s = session(3);
    s.dispatch(Command::Next).unwrap();

    assert_eq!(s.controller().current_index(), 1);
    assert!(s.controller().is_playing());
    assert_eq!(s.transport().loaded_locator(), Some("t1.mp3"));
    assert!(!s.transport().is_paused());
    assert_eq!(stored(&s, LAST_TRACK_INDEX_KEY).as_deref(), Some("1"));
}

#[test]
fn last_track_ending_with_repeat_off_stops() {
    let mut s = session(3);
    s.dispatch(Command::SelectTrack {
        locator: "t2.mp3".into(),
    })
    .unwrap();
    s.handle_transport_event(TransportEvent::Ended);

    assert_eq!(s.controller().current_index(), 2);
    assert!(!s.controller().is_playing());
    assert!(s.transport().is_paused());
    assert_eq!(s.transport().loaded_locator(), Some("t2.mp3"));
}

#[test]
fn last_track_ending_with_repeat_all_wraps() {
    let mut s = session(3);
    s.dispatch(Command::ToggleRepeat).unwrap();
    s.dispatch(Command::SelectTrack {
        locator: "t2.mp3".into(),
    })
    .unwrap();
    s.handle_transport_event(TransportEvent::Ended);

    assert_eq!(s.controller().current_index(), 0);
    assert_eq!(s.transport().loaded_locator(), Some("t0.mp3"));
    assert!(!s.transport().is_paused());
}

#[test]
fn repeat_one_rewinds_and_replays() {
    let mut s = session(3);
    s.dispatch(Command::ToggleRepeat).unwrap();
    s.dispatch(Command::ToggleRepeat).unwrap();
    assert_eq!(s.controller().repeat_policy(), RepeatPolicy::One);

    s.dispatch(Command::TogglePlayPause).unwrap();
    let plays = s.transport().plays;
    s.handle_transport_event(TransportEvent::TimeUpdate { elapsed_secs: 180.0 });
    s.handle_transport_event(TransportEvent::Ended);

    assert_eq!(s.controller().current_index(), 0);
    assert_eq!(s.transport().seeks, vec![Duration::ZERO]);
    assert_eq!(s.transport().plays, plays + 1);
    assert_eq!(s.transport().loads.len(), 1);
    assert_eq!(s.report().elapsed_secs, 0.0);
}

#[test]
fn unchanged_track_is_never_reloaded() {
    let mut s = session(3);
    for _ in 0..5 {
        s.dispatch(Command::TogglePlayPause).unwrap();
    }
    s.dispatch(Command::SetVolume(0.2)).unwrap();
    s.dispatch(Command::ToggleQueueView).unwrap();

    assert_eq!(s.transport().loads, vec!["t0.mp3"]);
}

#[test]
fn shuffle_round_trip_keeps_current_track() {
    let mut s = session(8);
    s.dispatch(Command::ToggleShuffle).unwrap();
    assert_eq!(s.controller().ordering_mode(), OrderingMode::Shuffled);
    assert!(s.controller().is_playing());

    s.dispatch(Command::Next).unwrap();
    let current = s.controller().current_track().cloned().unwrap();

    s.dispatch(Command::ToggleShuffle).unwrap();
    assert_eq!(s.controller().ordering_mode(), OrderingMode::Sequential);
    assert_eq!(s.controller().current_track(), Some(&current));
    assert_eq!(
        s.transport().loaded_locator(),
        Some(current.audio_locator.as_str())
    );
}

#[test]
fn filtered_selection_plays_the_chosen_track() {
    let catalog = Catalog::new(vec![
        TrackDescriptor::new("Sunrise", "a.mp3"),
        TrackDescriptor::new("Rain", "b.mp3"),
        TrackDescriptor::new("Sunset", "c.mp3"),
    ]);
    let config = PlaybackConfig::default();
    let mut s = PlaybackSession::new(
        catalog,
        FakeTransport::default(),
        MemorySessionStore::new(),
        &config,
    );

    s.dispatch(Command::ToggleQueueView).unwrap();
    s.dispatch(Command::SetSearchTerm("sun".into())).unwrap();
    s.dispatch(Command::SelectFiltered { position: 1 }).unwrap();

    assert_eq!(s.controller().current_index(), 2);
    assert_eq!(s.transport().loaded_locator(), Some("c.mp3"));
    assert!(!s.controller().queue_view().open);
}

#[test]
fn unmatched_search_leaves_playback_alone() {
    let mut s = session(3);
    s.dispatch(Command::Next).unwrap();
    s.dispatch(Command::ToggleQueueView).unwrap();
    s.dispatch(Command::SetSearchTerm("zzzz".into())).unwrap();

    assert!(s.controller().filtered_queue().is_empty());
    assert_eq!(s.controller().current_index(), 1);
    assert!(s.controller().is_playing());
    assert_eq!(s.transport().loaded_locator(), Some("t1.mp3"));
    assert!(!s.transport().is_paused());
    assert_eq!(s.transport().loads, vec!["t0.mp3", "t1.mp3"]);
}

#[test]
fn unknown_selection_leaves_session_unchanged() {
    let mut s = session(3);
    let err = s
        .dispatch(Command::SelectTrack {
            locator: "missing.mp3".into(),
        })
        .unwrap_err();

    assert!(matches!(err, PlaybackError::TrackNotFound(_)));
    assert_eq!(s.controller().current_index(), 0);
    assert_eq!(s.transport().loads.len(), 1);
}

// ===== Volume =====

#[test]
fn volume_changes_are_persisted_each_time() {
    let mut s = session(3);

    s.dispatch(Command::SetVolume(0.0)).unwrap();
    assert_eq!(stored(&s, VOLUME_KEY).as_deref(), Some("0"));
    assert_eq!(s.transport().volume(), 0.0);

    s.dispatch(Command::SetVolume(0.75)).unwrap();
    assert_eq!(stored(&s, VOLUME_KEY).as_deref(), Some("0.75"));
    assert_eq!(stored(&s, LAST_TRACK_INDEX_KEY).as_deref(), Some("0"));
}

#[test]
fn transport_volume_change_updates_intent() {
    let mut s = session(3);
    s.handle_transport_event(TransportEvent::VolumeChanged { level: 0.4 });

    assert_eq!(s.controller().volume(), 0.4);
    assert_eq!(stored(&s, VOLUME_KEY).as_deref(), Some("0.4"));
}

#[test]
fn out_of_range_transport_volume_is_clamped_without_echo() {
    let mut s = session(3);
    s.handle_transport_event(TransportEvent::VolumeChanged { level: 1.5 });

    assert_eq!(s.controller().volume(), 1.0);
    assert_eq!(stored(&s, VOLUME_KEY).as_deref(), Some("1"));
    // The transport reported the level itself, so nothing is written back
    assert_eq!(s.transport().volume(), 0.75);

    s.handle_transport_event(TransportEvent::VolumeChanged { level: f32::NAN });
    assert_eq!(s.controller().volume(), 1.0);
}

#[test]
fn mute_and_unmute() {
    let mut s = session(3);
    s.dispatch(Command::SetVolume(0.6)).unwrap();
    s.dispatch(Command::ToggleMute).unwrap();
    assert_eq!(s.transport().volume(), 0.0);

    s.dispatch(Command::ToggleMute).unwrap();
    assert_eq!(s.transport().volume(), 0.6);
}

// ===== Failures =====

#[test]
fn superseded_play_is_ignored() {
    let mut s = session(3);
    s.transport_mut().fail_next_play = Some(TransportError::Aborted);
    s.drain_events();

    s.dispatch(Command::Next).unwrap();

    assert!(s.controller().is_playing());
    assert!(!s
        .drain_events()
        .iter()
        .any(|event| matches!(event, PlaybackEvent::Notice { .. })));
}

#[test]
fn play_failure_is_surfaced_and_retryable() {
    let mut s = session(3);
    s.transport_mut().fail_next_play = Some(TransportError::failed("unsupported codec"));
    s.drain_events();

    s.dispatch(Command::TogglePlayPause).unwrap();
    assert!(s.controller().is_playing());
    assert!(s.transport().is_paused());
    assert!(s.drain_events().iter().any(|event| matches!(
        event,
        PlaybackEvent::Notice { message } if message.contains("unsupported codec")
    )));

    s.dispatch(Command::TogglePlayPause).unwrap();
    s.dispatch(Command::TogglePlayPause).unwrap();
    assert!(!s.transport().is_paused());
}

#[test]
fn late_play_failure_event_is_surfaced() {
    let mut s = session(3);
    s.drain_events();

    s.handle_transport_event(TransportEvent::PlayFailed(TransportError::Aborted));
    assert!(s.drain_events().is_empty());

    s.handle_transport_event(TransportEvent::PlayFailed(TransportError::failed("network")));
    assert!(matches!(
        s.drain_events().as_slice(),
        [PlaybackEvent::Notice { .. }]
    ));
}

// ===== Empty catalog =====

#[test]
fn empty_catalog_is_inert() {
    let mut s = session(0);

    for command in [
        Command::TogglePlayPause,
        Command::Next,
        Command::Previous,
        Command::ToggleShuffle,
        Command::Seek(10.0),
    ] {
        s.dispatch(command).unwrap();
    }
    s.handle_transport_event(TransportEvent::Ended);

    assert!(s.transport().loads.is_empty());
    assert_eq!(s.transport().plays, 0);
    assert!(s.transport().seeks.is_empty());
    assert!(!s.controller().is_playing());
    assert!(matches!(s.current_title(), Err(PlaybackError::NoCurrentTrack)));
}

// ===== Progress and seeking =====

#[test]
fn progress_follows_transport() {
    let mut s = session(3);
    s.handle_transport_event(TransportEvent::MetadataLoaded {
        duration_secs: 200.0,
    });
    s.handle_transport_event(TransportEvent::TimeUpdate { elapsed_secs: 12.5 });

    assert_eq!(s.report().duration_secs, 200.0);
    assert_eq!(s.report().elapsed_secs, 12.5);

    s.dispatch(Command::Next).unwrap();
    assert_eq!(s.report().duration_secs, 0.0);
    assert_eq!(s.report().elapsed_secs, 0.0);
}

#[test]
fn seek_moves_the_transport() {
    let mut s = session(3);
    s.dispatch(Command::Seek(42.0)).unwrap();
    s.dispatch(Command::Seek(-1.0)).unwrap();
    s.dispatch(Command::Seek(f64::NAN)).unwrap();

    assert_eq!(s.transport().seeks, vec![Duration::from_secs(42)]);
    assert_eq!(s.report().elapsed_secs, 42.0);
}

#[test]
fn seek_beyond_representable_range_is_ignored() {
    let mut s = session(3);
    s.dispatch(Command::Seek(1e30)).unwrap();
    s.seek(f64::MAX);

    assert!(s.transport().seeks.is_empty());
    assert_eq!(s.report().elapsed_secs, 0.0);

    s.dispatch(Command::Seek(5.0)).unwrap();
    assert_eq!(s.transport().seeks, vec![Duration::from_secs(5)]);
}

// ===== Proxy =====

#[test]
fn proxy_base_rewrites_transport_locators() {
    let config = PlaybackConfig {
        proxy_base: Some("http://localhost:8080".into()),
        ..PlaybackConfig::default()
    };
    let s = PlaybackSession::new(
        Catalog::new(vec![TrackDescriptor::new("A", "https://cdn.example.com/a.mp3")]),
        FakeTransport::default(),
        MemorySessionStore::new(),
        &config,
    );

    assert_eq!(
        s.transport().loaded_locator(),
        Some("http://localhost:8080/api/proxy?url=https%3A%2F%2Fcdn.example.com%2Fa.mp3")
    );
}

// ===== Visualizer and shutdown =====

#[test]
fn visualizer_renders_only_while_playing() {
    let mut s = session(3);
    s.transport_mut().tap = Some(ToneTap);

    assert_eq!(s.visualizer().state(), FrameLoopState::Idle);
    assert!(s.render_frame().is_none());

    s.dispatch(Command::TogglePlayPause).unwrap();
    let frame = s.render_frame().unwrap();
    assert_eq!(frame.bins.len(), 128);

    s.dispatch(Command::TogglePlayPause).unwrap();
    assert!(s.render_frame().is_none());
}

#[test]
fn visualizer_without_tap_renders_nothing() {
    let mut s = session(3);
    s.dispatch(Command::TogglePlayPause).unwrap();
    assert_eq!(s.visualizer().state(), FrameLoopState::Armed);
    assert!(s.render_frame().is_none());
}

#[test]
fn shutdown_releases_transport_and_stops_visualizer() {
    let mut s = session(3);
    s.transport_mut().tap = Some(ToneTap);
    s.dispatch(Command::TogglePlayPause).unwrap();

    s.shutdown();

    assert!(s.is_shut_down());
    assert!(s.transport().released);
    assert!(s.transport().is_paused());
    assert_eq!(s.visualizer().state(), FrameLoopState::TornDown);
    assert!(s.render_frame().is_none());

    s.dispatch(Command::Next).unwrap();
    assert_eq!(s.controller().current_index(), 0);
}
