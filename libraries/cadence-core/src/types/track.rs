/// Track descriptor domain type
use serde::{Deserialize, Serialize};

/// One entry of the catalog
///
/// Tracks are identified by their audio locator; titles are not guaranteed unique.
/// On the wire a descriptor looks like
/// `{"title": "...", "file": {"url": "..."}, "trackImage": {"url": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WireTrack", into = "WireTrack")]
pub struct TrackDescriptor {
    /// Display title
    pub title: String,

    /// Remote audio locator (the track's identity)
    pub audio_locator: String,

    /// Remote artwork locator
    pub artwork_locator: Option<String>,
}

impl TrackDescriptor {
    /// Create a descriptor without artwork
    pub fn new(title: impl Into<String>, audio_locator: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            audio_locator: audio_locator.into(),
            artwork_locator: None,
        }
    }

    /// Attach an artwork locator
    pub fn with_artwork(mut self, artwork_locator: impl Into<String>) -> Self {
        self.artwork_locator = Some(artwork_locator.into());
        self
    }

    /// Whether this descriptor refers to the given audio locator
    pub fn is_locator(&self, locator: &str) -> bool {
        self.audio_locator == locator
    }
}

#[derive(Serialize, Deserialize)]
struct WireLink {
    url: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTrack {
    title: String,
    file: WireLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    track_image: Option<WireLink>,
}

impl From<WireTrack> for TrackDescriptor {
    fn from(wire: WireTrack) -> Self {
        Self {
            title: wire.title,
            audio_locator: wire.file.url,
            artwork_locator: wire.track_image.map(|image| image.url),
        }
    }
}

impl From<TrackDescriptor> for WireTrack {
    fn from(track: TrackDescriptor) -> Self {
        Self {
            title: track.title,
            file: WireLink {
                url: track.audio_locator,
            },
            track_image: track.artwork_locator.map(|url| WireLink { url }),
        }
    }
}
