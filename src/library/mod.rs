use std::{
    fmt,
    path::{Path, PathBuf},
};

pub mod local;
pub mod remote;
mod types;

pub use remote::{FetchParams, RemoteClient};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Where the audio of a [`Track`] comes from. Local files and remote
/// downloads are handed to the player the same way, only the location differs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackSource {
    Local(PathBuf),
    Remote(String),
}

impl TrackSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Cover image belonging to exactly one track.
#[derive(Debug, PartialEq, Eq)]
pub struct Artwork {
    path: PathBuf,
}

impl Artwork {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub source: TrackSource,
    artwork: Option<Artwork>,
}

impl Track {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, source: TrackSource) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source,
            artwork: None,
        }
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Artwork is loaded after construction. Replacing it drops the old one.
    pub fn set_artwork(&mut self, artwork: Artwork) {
        self.artwork = Some(artwork);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    Local,
    Remote,
}

/// The list of tracks backing the music browser. It is only ever replaced as
/// a whole, never mutated while the UI reads from it.
#[derive(Debug, Default)]
pub struct Catalog {
    source: CatalogSource,
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(source: CatalogSource, tracks: Vec<Track>) -> Self {
        Self { source, tracks }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
