//! Property-based tests for the playback controller
//!
//! Uses proptest to check invariants across random catalogs and command sequences.

use cadence_core::{Catalog, TrackDescriptor};
use cadence_playback::{
    format_time, Command, NaturalEnd, OrderingMode, PlaybackConfig, PlaybackController,
    RepeatPolicy,
};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::vec("[A-Za-z ]{1,20}", 1..40).prop_map(|titles| {
        Catalog::new(
            titles
                .into_iter()
                .enumerate()
                .map(|(i, title)| TrackDescriptor::new(title, format!("https://cdn/{i}.mp3")))
                .collect(),
        )
    })
}

fn arbitrary_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::TogglePlayPause),
        Just(Command::Next),
        Just(Command::Previous),
        Just(Command::ToggleShuffle),
        Just(Command::ToggleRepeat),
        Just(Command::ToggleMute),
        Just(Command::ToggleQueueView),
        (0usize..50).prop_map(|position| Command::SelectFiltered { position }),
        any::<f32>().prop_map(Command::SetVolume),
        "[a-z]{0,3}".prop_map(Command::SetSearchTerm),
    ]
}

fn controller(catalog: Catalog, seed: u64) -> PlaybackController {
    PlaybackController::with_seed(catalog, &PlaybackConfig::default(), seed)
}

// ===== Property Tests =====

proptest! {
    /// Property: the current index always addresses a track
    #[test]
    fn current_index_stays_in_bounds(
        catalog in arbitrary_catalog(),
        commands in prop::collection::vec(arbitrary_command(), 0..100),
        ends in prop::collection::vec(any::<bool>(), 0..100),
        seed in any::<u64>(),
    ) {
        let len = catalog.len();
        let mut c = controller(catalog, seed);

        for (command, end) in commands.iter().zip(ends.iter().chain(std::iter::repeat(&false))) {
            let _ = c.apply(command);
            if *end {
                c.handle_natural_end();
            }
            prop_assert!(c.current_index() < len);
            prop_assert!(c.current_track().is_some());
        }
    }

    /// Property: volume is always a finite level in [0, 1]
    #[test]
    fn volume_stays_in_range(levels in prop::collection::vec(any::<f32>(), 1..50)) {
        let mut c = controller(Catalog::new(vec![TrackDescriptor::new("A", "a.mp3")]), 0);
        for level in levels {
            c.set_volume(level);
            prop_assert!(c.volume().is_finite());
            prop_assert!((0.0..=1.0).contains(&c.volume()));
        }
    }

    /// Property: the shuffled ordering is a permutation of the catalog
    #[test]
    fn shuffle_is_permutation(catalog in arbitrary_catalog(), seed in any::<u64>()) {
        let len = catalog.len();
        let mut c = controller(catalog, seed);
        c.toggle_shuffle();

        let mut positions = c.shuffled_order().unwrap().positions().to_vec();
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..len).collect::<Vec<_>>());
        prop_assert_eq!(c.current_index(), 0);
    }

    /// Property: switching shuffle off keeps the same track current
    #[test]
    fn unshuffle_preserves_current_track(
        catalog in arbitrary_catalog(),
        skips in 0usize..60,
        seed in any::<u64>(),
    ) {
        let mut c = controller(catalog, seed);
        c.toggle_shuffle();
        for _ in 0..skips {
            c.next();
        }
        let before = c.current_track().cloned();

        c.toggle_shuffle();
        prop_assert_eq!(c.ordering_mode(), OrderingMode::Sequential);
        prop_assert_eq!(c.current_track().cloned(), before);
    }

    /// Property: next then previous returns to the same position
    #[test]
    fn next_previous_inverse(catalog in arbitrary_catalog(), start in 0usize..40) {
        let len = catalog.len();
        let mut c = controller(catalog, 0);
        let target = format!("https://cdn/{}.mp3", start % len);
        c.select_track(&target).unwrap();

        let index = c.current_index();
        c.next();
        c.previous();
        prop_assert_eq!(c.current_index(), index);
    }

    /// Property: the filtered queue is an order-preserving subset of matching tracks
    #[test]
    fn filtered_queue_is_ordered_subset(
        catalog in arbitrary_catalog(),
        term in "[a-zA-Z]{0,2}",
        shuffle in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut c = controller(catalog, seed);
        if shuffle {
            c.toggle_shuffle();
        }
        c.set_search_term(term.clone());

        let entries = c.filtered_queue();
        let ordering = c.ordering();
        let lowered = term.to_lowercase();

        for pair in entries.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        for entry in &entries {
            prop_assert_eq!(ordering.get(entry.index), Some(entry.track));
            prop_assert!(entry.track.title.to_lowercase().contains(&lowered));
        }
        let expected = ordering
            .iter()
            .filter(|track| track.title.to_lowercase().contains(&lowered))
            .count();
        prop_assert_eq!(entries.len(), expected);
    }

    /// Property: formatted time is always MM:SS
    #[test]
    fn format_time_shape(secs in any::<f64>()) {
        let formatted = format_time(secs);
        prop_assert_eq!(formatted.len(), 5);
        prop_assert_eq!(&formatted[2..3], ":");
        let minutes: u32 = formatted[..2].parse().unwrap();
        let seconds: u32 = formatted[3..].parse().unwrap();
        prop_assert!(minutes < 60 && seconds < 60);
    }

    /// Property: repeat-one rewinds in place however many times the track ends
    #[test]
    fn repeat_one_never_moves(
        catalog in arbitrary_catalog(),
        start in 0usize..40,
        ends in 1usize..20,
    ) {
        let len = catalog.len();
        let mut c = controller(catalog, 7);
        for _ in 0..(start % len) {
            c.apply(&Command::Next).unwrap();
        }
        c.apply(&Command::ToggleRepeat).unwrap();
        c.apply(&Command::ToggleRepeat).unwrap();
        prop_assert_eq!(c.repeat_policy(), RepeatPolicy::One);

        let index = c.current_index();
        let generation = c.restart_generation();
        for _ in 0..ends {
            prop_assert_eq!(c.handle_natural_end(), NaturalEnd::Restarted);
            prop_assert_eq!(c.current_index(), index);
        }
        prop_assert_eq!(c.restart_generation(), generation + ends as u64);
    }

    /// Property: the repeat policy cycles with period three
    #[test]
    fn repeat_cycles_back_to_off(catalog in arbitrary_catalog(), rounds in 1usize..5) {
        let mut c = controller(catalog, 1);
        for _ in 0..rounds * 3 {
            c.apply(&Command::ToggleRepeat).unwrap();
        }
        prop_assert_eq!(c.repeat_policy(), RepeatPolicy::Off);
    }
}
