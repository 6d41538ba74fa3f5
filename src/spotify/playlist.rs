use std::collections::HashSet;

use crate::{
    error::Result,
    info,
    spotify::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, CurrentUser,
        GetUserPlaylistsResponse, Playlist, PlaylistTracksPage,
    },
    utils,
};

pub const PLAYLIST_DESCRIPTION: &str = "Created by Spotify Playlist Manager";

/// Playlists inspected when looking for an existing one by name.
pub const PLAYLIST_LOOKUP_LIMIT: usize = 50;

/// Maximum number of URIs Spotify accepts in one add-tracks request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Leave out tracks that are already in the playlist.
    pub skip_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created {
        playlist: Playlist,
        added: usize,
    },
    Updated {
        playlist: Playlist,
        added: usize,
        skipped: usize,
    },
}

impl SyncOutcome {
    pub fn playlist(&self) -> &Playlist {
        match self {
            SyncOutcome::Created { playlist, .. } | SyncOutcome::Updated { playlist, .. } => {
                playlist
            }
        }
    }

    pub fn added(&self) -> usize {
        match self {
            SyncOutcome::Created { added, .. } | SyncOutcome::Updated { added, .. } => *added,
        }
    }
}

/// Fetches the profile of the user the client is authorized for.
///
/// Only the id is needed: playlists are listed and created under it.
///
/// # Errors
///
/// `Error::Api` when the token is rejected, otherwise transport or decode
/// failures.
pub async fn current_user(client: &SpotifyClient) -> Result<CurrentUser> {
    client.get("me").await
}

/// Looks for a playlist named exactly `name` among the user's first 50.
///
/// The comparison is case-sensitive and the first match wins. Playlists
/// beyond the first [`PLAYLIST_LOOKUP_LIMIT`] are not inspected, so a
/// matching playlist further down the list leads to a new one being created.
/// `null` entries in the listing are ignored.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `user_id` - Owner whose playlists are listed
/// * `name` - Exact playlist name to look for
///
/// # Returns
///
/// `Some(playlist)` for the first exact match, `None` otherwise.
///
/// # Errors
///
/// Any failure of the listing request.
pub async fn find_playlist(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
) -> Result<Option<Playlist>> {
    let playlists: GetUserPlaylistsResponse = client
        .get_with_query(
            &format!("users/{}/playlists", user_id),
            &[("limit", PLAYLIST_LOOKUP_LIMIT)],
        )
        .await?;

    Ok(playlists
        .items
        .into_iter()
        .flatten()
        .find(|p| p.name == name))
}

/// Creates a private playlist owned by `user_id`.
///
/// The playlist gets the fixed [`PLAYLIST_DESCRIPTION`] and is never public.
///
/// # Returns
///
/// The created playlist as reported by Spotify, including its new id.
///
/// # Errors
///
/// `Error::Api` with Spotify's status and body when creation is refused,
/// for example when the token lacks `playlist-modify-private`.
pub async fn create(client: &SpotifyClient, user_id: &str, name: &str) -> Result<Playlist> {
    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: PLAYLIST_DESCRIPTION.to_string(),
        public: false,
    };

    client
        .post(&format!("users/{}/playlists", user_id), &request)
        .await
}

/// Appends tracks to a playlist in order, at most 100 per request.
///
/// Returns the number of tracks appended. No request is sent for an empty
/// list.
///
/// # Arguments
///
/// * `client` - Authenticated Spotify client
/// * `playlist_id` - Playlist to append to
/// * `track_ids` - Bare track ids; each becomes a `spotify:track:<id>` URI
///
/// # Errors
///
/// The first failed batch aborts the call. Batches sent before it stay in
/// the playlist.
pub async fn add_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    track_ids: &[String],
) -> Result<usize> {
    for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
        let request = AddTrackToPlaylistRequest {
            uris: chunk.iter().map(|id| utils::track_uri(id)).collect(),
        };

        let _: AddTrackToPlaylistResponse = client
            .post(&format!("playlists/{}/tracks", playlist_id), &request)
            .await?;
    }

    Ok(track_ids.len())
}

/// Collects the ids of every track already in a playlist.
///
/// Pages of [`MAX_TRACKS_PER_REQUEST`] entries are requested with a field
/// filter until Spotify reports no `next` page. Local files and removed
/// tracks carry no id and are left out.
///
/// # Errors
///
/// Any failure of a page request.
pub async fn get_track_ids(client: &SpotifyClient, playlist_id: &str) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    let mut offset = 0;

    loop {
        let page: PlaylistTracksPage = client
            .get_with_query(
                &format!("playlists/{}/tracks", playlist_id),
                &[
                    ("fields", "items(track(id)),next".to_string()),
                    ("limit", MAX_TRACKS_PER_REQUEST.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        let received = page.items.len();
        ids.extend(
            page.items
                .into_iter()
                .filter_map(|item| item.track.and_then(|track| track.id)),
        );

        if page.next.is_none() || received == 0 {
            break;
        }
        offset += received;
    }

    Ok(ids)
}

/// Appends `track_ids` to the playlist named `name`, creating it first when
/// the user has none by that name.
///
/// Without [`SyncOptions::skip_existing`] every id is appended, so running
/// twice with the same input duplicates the entries. With it, ids already in
/// the playlist (or repeated in the input) are left out.
///
/// # Errors
///
/// The first failed request aborts the sync and surfaces the provider's
/// status and body.
pub async fn create_or_update_playlist(
    client: &SpotifyClient,
    name: &str,
    track_ids: &[String],
    options: SyncOptions,
) -> Result<SyncOutcome> {
    let user = current_user(client).await?;

    match find_playlist(client, &user.id, name).await? {
        Some(playlist) => {
            info!("Updating existing playlist: {}", name);

            let to_add: Vec<String> = if options.skip_existing {
                let mut seen = get_track_ids(client, &playlist.id).await?;
                track_ids
                    .iter()
                    .filter(|id| seen.insert((*id).clone()))
                    .cloned()
                    .collect()
            } else {
                track_ids.to_vec()
            };

            let skipped = track_ids.len() - to_add.len();
            let added = add_tracks(client, &playlist.id, &to_add).await?;

            Ok(SyncOutcome::Updated {
                playlist,
                added,
                skipped,
            })
        }
        None => {
            info!("Creating playlist: {}", name);

            let playlist = create(client, &user.id, name).await?;
            let added = add_tracks(client, &playlist.id, track_ids).await?;

            Ok(SyncOutcome::Created { playlist, added })
        }
    }
}
