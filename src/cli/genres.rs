use tabled::Table;
use tokio_util::sync::CancellationToken;

use crate::{
    cli::auth::{load_config, login},
    error, info, spotify, utils, warning,
};

pub async fn genres(
    top: usize,
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

    let counts = match spotify::filter::count_genres(&client, &liked_songs).await {
        Ok(counts) => counts,
        Err(e) => error!("Failed to collect genres: {}", e),
    };

    if counts.is_empty() {
        warning!("No genres found in {} liked songs", liked_songs.len());
        return;
    }

    info!(
        "{} genres across {} liked songs",
        counts.len(),
        liked_songs.len()
    );

    let table = Table::new(utils::top_genres(&counts, top));
    println!("{}", table);
}
