//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use genrify::spotify::SpotifyClient;
use serde_json::{Value, json};
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "test-access-token";

pub fn client_for(server: &MockServer) -> SpotifyClient {
    SpotifyClient::with_access_token(format!("{}/v1", server.uri()), ACCESS_TOKEN)
}

pub fn bearer() -> String {
    format!("Bearer {}", ACCESS_TOKEN)
}

pub fn track_json(id: &str, artist_ids: &[&str]) -> Value {
    let artists: Vec<Value> = artist_ids
        .iter()
        .map(|artist_id| json!({ "id": artist_id, "name": format!("Artist {}", artist_id) }))
        .collect();

    json!({
        "id": id,
        "name": format!("Track {}", id),
        "artists": artists,
    })
}

pub fn saved_tracks_page(tracks: Vec<Value>) -> Value {
    let items: Vec<Value> = tracks
        .into_iter()
        .map(|track| json!({ "added_at": "2024-01-01T00:00:00Z", "track": track }))
        .collect();

    json!({ "items": items })
}

/// A page of `count` single-artist tracks numbered from `start`.
pub fn numbered_page(start: usize, count: usize) -> Value {
    saved_tracks_page(
        (start..start + count)
            .map(|i| track_json(&format!("t{}", i), &["artist"]))
            .collect(),
    )
}

pub fn artist_json(id: &str, genres: &[&str]) -> Value {
    json!({
        "id": id,
        "name": format!("Artist {}", id),
        "genres": genres,
        "popularity": 50,
    })
}

pub fn playlist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "public": false,
        "collaborative": false,
        "snapshot_id": "snap",
    })
}
