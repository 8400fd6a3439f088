//! Active ordering over the catalog
//!
//! The catalog is never reordered. Shuffling produces a permutation of catalog
//! positions, and every index the controller hands out is a position in whichever
//! ordering is active.

use crate::types::OrderingMode;
use cadence_core::{Catalog, TrackDescriptor};
use rand::seq::SliceRandom;
use rand::Rng;

/// Permutation of catalog positions produced by a Fisher-Yates shuffle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledOrder {
    positions: Vec<usize>,
}

impl ShuffledOrder {
    /// Shuffle the positions `0..len`
    ///
    /// Every permutation is equally likely.
    pub fn generate<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut positions: Vec<usize> = (0..len).collect();
        positions.shuffle(rng);
        Self { positions }
    }

    /// Catalog positions in shuffled order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the permutation is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Read-only view of the catalog in the active ordering
#[derive(Debug, Clone, Copy)]
pub struct ActiveOrdering<'a> {
    catalog: &'a Catalog,
    shuffled: Option<&'a ShuffledOrder>,
}

impl<'a> ActiveOrdering<'a> {
    /// View over `catalog`, shuffled when a permutation is given
    pub fn new(catalog: &'a Catalog, shuffled: Option<&'a ShuffledOrder>) -> Self {
        Self { catalog, shuffled }
    }

    /// Mode this view represents
    pub fn mode(&self) -> OrderingMode {
        if self.shuffled.is_some() {
            OrderingMode::Shuffled
        } else {
            OrderingMode::Sequential
        }
    }

    /// Number of tracks (always the catalog's length)
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether there are no tracks
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Catalog position of an active-ordering position
    pub fn catalog_position(&self, index: usize) -> Option<usize> {
        match self.shuffled {
            Some(order) => order.positions().get(index).copied(),
            None => (index < self.catalog.len()).then_some(index),
        }
    }

    /// Track at an active-ordering position
    pub fn get(&self, index: usize) -> Option<&'a TrackDescriptor> {
        self.catalog_position(index)
            .and_then(|position| self.catalog.get(position))
    }

    /// Active-ordering position of the first track with this locator
    pub fn position_of(&self, locator: &str) -> Option<usize> {
        self.iter().position(|track| track.is_locator(locator))
    }

    /// Iterate tracks in active order
    pub fn iter(&self) -> impl Iterator<Item = &'a TrackDescriptor> + 'a {
        let view = *self;
        (0..view.len()).filter_map(move |index| view.get(index))
    }
}
