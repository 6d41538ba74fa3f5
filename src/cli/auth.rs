use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    config::{self, Config},
    error,
    spotify::{
        self, SpotifyClient,
        auth::{AuthOptions, DEFAULT_LOGIN_TIMEOUT},
    },
};

pub(crate) async fn load_config() -> Config {
    match config::load().await {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    }
}

pub(crate) async fn login(
    config: &Config,
    timeout_secs: Option<u64>,
    open_browser: bool,
    cancel: CancellationToken,
) -> SpotifyClient {
    let options = AuthOptions {
        timeout: timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LOGIN_TIMEOUT),
        open_browser,
    };

    match spotify::auth::authenticate(config, &options, cancel).await {
        Ok(client) => client,
        Err(e) => error!("Failed to authenticate: {}", e),
    }
}
