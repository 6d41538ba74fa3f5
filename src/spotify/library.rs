use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error::Result,
    spotify::SpotifyClient,
    types::{SavedTracksPage, Track},
};

/// Number of saved tracks requested per page; the API maximum.
pub const PAGE_SIZE: usize = 50;

/// Retrieves every track in the user's library, in library order.
///
/// Pages are requested at offsets `0, 50, 100, ...` until a page comes back
/// with fewer than [`PAGE_SIZE`] items. The result is all-or-nothing: the
/// first failed page aborts the whole fetch and the tracks collected so far
/// are dropped.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client with `user-library-read`
///
/// # Returns
///
/// Every saved track, most recently saved first as Spotify orders them.
///
/// # Errors
///
/// - `Error::Transport` on network failures
/// - `Error::Api` when Spotify answers with a non-success status
/// - `Error::Decode` when a page is not valid JSON for the expected shape
pub async fn get_liked_songs(client: &SpotifyClient) -> Result<Vec<Track>> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching liked songs...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = fetch_all_pages(client, &pb).await;
    pb.finish_and_clear();
    result
}

async fn fetch_all_pages(client: &SpotifyClient, pb: &ProgressBar) -> Result<Vec<Track>> {
    let mut liked_songs = Vec::new();
    let mut offset = 0;

    loop {
        let page: SavedTracksPage = client
            .get_with_query("me/tracks", &[("limit", PAGE_SIZE), ("offset", offset)])
            .await?;

        let received = page.items.len();
        liked_songs.extend(page.items.into_iter().map(|item| item.track));
        pb.set_message(format!("Fetching liked songs... {}", liked_songs.len()));

        if received < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }

    Ok(liked_songs)
}
