/// Catalog domain type
use super::TrackDescriptor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered, immutable sequence of tracks supplied once per session
///
/// Cloning a catalog is cheap; clones share the same track list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TrackDescriptor>", into = "Vec<TrackDescriptor>")]
pub struct Catalog {
    tracks: Arc<[TrackDescriptor]>,
}

impl Catalog {
    /// Create a catalog from tracks in their native order
    pub fn new(tracks: Vec<TrackDescriptor>) -> Self {
        Self {
            tracks: tracks.into(),
        }
    }

    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at a native position
    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    /// All tracks in native order
    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    /// Iterate tracks in native order
    pub fn iter(&self) -> std::slice::Iter<'_, TrackDescriptor> {
        self.tracks.iter()
    }

    /// Native position of the first track with the given audio locator
    pub fn position_of(&self, locator: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.is_locator(locator))
    }
}

impl From<Vec<TrackDescriptor>> for Catalog {
    fn from(tracks: Vec<TrackDescriptor>) -> Self {
        Self::new(tracks)
    }
}

impl From<Catalog> for Vec<TrackDescriptor> {
    fn from(catalog: Catalog) -> Self {
        catalog.tracks.to_vec()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TrackDescriptor;
    type IntoIter = std::slice::Iter<'a, TrackDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
