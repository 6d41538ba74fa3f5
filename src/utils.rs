use std::{cmp::Ordering, collections::BTreeMap};

use rand::Rng;

use crate::types::GenreTableRow;

/// Bytes of randomness in an OAuth state token.
pub const STATE_BYTES: usize = 16;

/// Generates a random, hex-encoded OAuth state token.
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

pub fn default_playlist_name(genre: &str) -> String {
    format!("{} playlist", genre)
}

/// Turns genre counts into table rows, most common first, ties by name.
pub fn top_genres(counts: &BTreeMap<String, usize>, limit: usize) -> Vec<GenreTableRow> {
    let mut rows: Vec<GenreTableRow> = counts
        .iter()
        .map(|(genre, tracks)| GenreTableRow {
            genre: genre.clone(),
            tracks: *tracks,
        })
        .collect();

    rows.sort_by(|a, b| match b.tracks.cmp(&a.tracks) {
        Ordering::Equal => a.genre.cmp(&b.genre),
        other => other,
    });
    rows.truncate(limit);
    rows
}
