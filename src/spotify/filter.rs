use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error::Result,
    spotify::{SpotifyClient, artists::ArtistGenreResolver},
    types::Track,
    warning,
};

/// Returns the ids of the tracks whose first artist carries `genre`.
///
/// Tracks are checked in input order and the output keeps that order. Only
/// the first listed artist counts, and the genre must match exactly
/// (case-sensitive). Tracks without any artist are skipped with a warning.
///
/// # Errors
///
/// The first failed artist lookup aborts the filter; no partial list is
/// returned.
pub async fn filter_songs_by_genre(
    client: &SpotifyClient,
    songs: &[Track],
    genre: &str,
) -> Result<Vec<String>> {
    let mut resolver = ArtistGenreResolver::new(client);
    let pb = progress_bar(songs.len(), "Checking genres");

    let mut filtered_track_ids = Vec::new();
    for song in songs {
        pb.inc(1);
        let Some(artist) = song.primary_artist() else {
            pb.suspend(|| warning!("Skipping \"{}\": track has no artists", song.name));
            continue;
        };

        let artist = match resolver.resolve(&artist.id).await {
            Ok(artist) => artist,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        if artist.has_genre(genre) {
            filtered_track_ids.push(song.id.clone());
        }
    }

    pb.finish_and_clear();
    Ok(filtered_track_ids)
}

/// Counts how many tracks fall under each genre of their first artist.
///
/// A track counts once for every genre its first artist carries.
pub async fn count_genres(client: &SpotifyClient, songs: &[Track]) -> Result<BTreeMap<String, usize>> {
    let mut resolver = ArtistGenreResolver::new(client);
    let pb = progress_bar(songs.len(), "Collecting genres");

    let mut counts = BTreeMap::new();
    for song in songs {
        pb.inc(1);
        let Some(artist) = song.primary_artist() else {
            continue;
        };

        let artist = match resolver.resolve(&artist.id).await {
            Ok(artist) => artist,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        for genre in &artist.genres {
            *counts.entry(genre.clone()).or_insert(0) += 1;
        }
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message);
    pb
}
