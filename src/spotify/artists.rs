use std::collections::HashMap;

use crate::{error::Result, spotify::SpotifyClient, types::Artist};

/// Fetches a single artist, including its genre tags.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `artist_id` - Spotify ID of the artist
///
/// # Returns
///
/// The artist with its genre set. Spotify may return an empty set for
/// artists it has not classified.
///
/// # Errors
///
/// - `Error::Api` for unknown ids or expired tokens (status and body kept)
/// - `Error::Transport` on network failures
/// - `Error::Decode` when the response is not an artist object
pub async fn get_artist_details(client: &SpotifyClient, artist_id: &str) -> Result<Artist> {
    client.get(&format!("artists/{}", artist_id)).await
}

/// Resolves artist genres, fetching each distinct artist at most once.
///
/// The cache lives as long as the resolver, which is one run. Failed
/// lookups are not cached.
pub struct ArtistGenreResolver<'a> {
    client: &'a SpotifyClient,
    cache: HashMap<String, Artist>,
    lookups: usize,
}

impl<'a> ArtistGenreResolver<'a> {
    pub fn new(client: &'a SpotifyClient) -> Self {
        Self {
            client,
            cache: HashMap::new(),
            lookups: 0,
        }
    }

    /// Returns the artist for `artist_id`, fetching it on first use.
    ///
    /// Later calls for the same id are answered from the cache without a
    /// request. A failed fetch leaves the cache untouched, so the next call
    /// for that id tries again.
    ///
    /// # Arguments
    ///
    /// * `artist_id` - Spotify ID of the artist, usually the first artist of
    ///   a track
    ///
    /// # Errors
    ///
    /// Whatever [`get_artist_details`] returns for the id.
    pub async fn resolve(&mut self, artist_id: &str) -> Result<&Artist> {
        if !self.cache.contains_key(artist_id) {
            let artist = get_artist_details(self.client, artist_id).await?;
            self.lookups += 1;
            self.cache.insert(artist_id.to_string(), artist);
        }

        Ok(&self.cache[artist_id])
    }

    /// Number of requests sent so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}
