//! Queue search
//!
//! Filtering never changes the active ordering. Each entry remembers where it sits in
//! the active ordering so a selection made from a filtered list resolves to the right
//! track.

use crate::ordering::ActiveOrdering;
use cadence_core::TrackDescriptor;

/// One row of the filtered queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry<'a> {
    /// Position in the active ordering
    pub index: usize,

    /// The track
    pub track: &'a TrackDescriptor,

    /// Whether this is the current track
    pub is_current: bool,
}

/// Whether a title matches a search term (case-insensitive substring)
pub fn matches(title: &str, term: &str) -> bool {
    term.is_empty() || title.to_lowercase().contains(&term.to_lowercase())
}

/// Tracks of the active ordering whose titles match `term`, in active order
pub fn filter_queue<'a>(
    ordering: ActiveOrdering<'a>,
    term: &str,
    current_index: usize,
) -> Vec<QueueEntry<'a>> {
    let term = term.to_lowercase();
    ordering
        .iter()
        .enumerate()
        .filter(|(_, track)| matches(&track.title, &term))
        .map(|(index, track)| QueueEntry {
            index,
            track,
            is_current: index == current_index,
        })
        .collect()
}
