use tokio_util::sync::CancellationToken;

use crate::{
    cli::auth::{load_config, login},
    error, info, spotify,
    spotify::playlist::{SyncOptions, SyncOutcome},
    success, utils, warning,
};

pub async fn sync(
    genre: String,
    playlist_name: Option<String>,
    skip_existing: bool,
    timeout_secs: Option<u64>,
    open_browser: bool,
    cancel: CancellationToken,
) {
    let config = load_config().await;
    let client = login(&config, timeout_secs, open_browser, cancel).await;

    let liked_songs = match spotify::library::get_liked_songs(&client).await {
        Ok(songs) => songs,
        Err(e) => error!("Failed to get liked songs: {}", e),
    };
    success!("Fetched {} liked songs", liked_songs.len());

    let filtered_track_ids =
        match spotify::filter::filter_songs_by_genre(&client, &liked_songs, &genre).await {
            Ok(ids) => ids,
            Err(e) => error!("Failed to filter songs by genre: {}", e),
        };

    if filtered_track_ids.is_empty() {
        warning!("None of your liked songs match genre \"{}\"", genre);
    } else {
        info!(
            "{} of {} liked songs match genre \"{}\"",
            filtered_track_ids.len(),
            liked_songs.len(),
            genre
        );
    }

    let playlist_name = playlist_name.unwrap_or_else(|| utils::default_playlist_name(&genre));
    let options = SyncOptions { skip_existing };

    match spotify::playlist::create_or_update_playlist(
        &client,
        &playlist_name,
        &filtered_track_ids,
        options,
    )
    .await
    {
        Ok(SyncOutcome::Created { added, .. }) => {
            success!(
                "Playlist created successfully: {} ({} tracks)",
                playlist_name,
                added
            )
        }
        Ok(SyncOutcome::Updated { added, skipped, .. }) => {
            if skipped > 0 {
                info!("{} tracks were already in the playlist", skipped);
            }
            success!(
                "Playlist updated successfully: {} ({} tracks added)",
                playlist_name,
                added
            )
        }
        Err(e) => error!("Failed to create playlist: {}", e),
    }
}
