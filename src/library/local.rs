use std::path::Path;

use lofty::prelude::*;
use log::{debug, warn};
use walkdir::WalkDir;

use super::{Artwork, Track, TrackSource, UNKNOWN_ARTIST};
use crate::AppError;

pub const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "flac", "ogg", "wav", "m4a"];

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Lists the audio files directly inside `music_dir`, sorted by file name.
/// Artwork is picked up from `music_dir/artwork/<stem>.png`.
pub fn scan(music_dir: &Path) -> Result<Vec<Track>, AppError> {
    if !music_dir.is_dir() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", music_dir.display()),
        )));
    }
    let artwork_dir = music_dir.join("artwork");

    let mut tracks = Vec::new();
    for entry in WalkDir::new(music_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio(path) {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let tags = read_tags(path).unwrap_or_else(|e| {
            debug!("no tags for {}: {e}", path.display());
            None
        });
        let (title, artist) = names(tags, &stem);

        let mut track = Track::new(title, artist, TrackSource::Local(path.to_path_buf()));

        let artwork = artwork_dir.join(format!("{stem}.png"));
        if artwork.is_file() {
            track.set_artwork(Artwork::new(artwork));
        }
        tracks.push(track);
    }

    debug!("found {} local tracks in {}", tracks.len(), music_dir.display());
    Ok(tracks)
}

type Tags = (Option<String>, Option<String>);

/// Title and artist from the primary tag, or whichever tag the file has.
/// `None` if the file carries no tag at all.
fn read_tags(path: &Path) -> Result<Option<Tags>, AppError> {
    let tagged_file = lofty::read_from_path(path)?;
    Ok(tagged_file
        .primary_tag()
        .or(tagged_file.first_tag())
        .map(|tag| {
            (
                tag.title().map(|t| t.into_owned()),
                tag.artist().map(|a| a.into_owned()),
            )
        }))
}

/// Display title and artist. An untitled file is named after its stem, the
/// artist is only "Unknown" when there was no tag to ask.
fn names(tags: Option<Tags>, stem: &str) -> (String, String) {
    let (title, artist) = match tags {
        Some((title, artist)) => (title, artist.unwrap_or_default()),
        None => (None, UNKNOWN_ARTIST.to_string()),
    };
    let title = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| stem.to_string());
    (title, artist)
}
