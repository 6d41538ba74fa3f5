//! Configuration management for genrify.
//!
//! Configuration is read from environment variables, which may be provided
//! through `.env` files. The lookup order is:
//! 1. Variables already set in the process environment
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`genrify/.env`)
//!
//! Only the client id, client secret and redirect URI are required. The
//! Spotify endpoints default to the public service and exist as variables so
//! the whole flow can be pointed at another host.

use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use crate::error::{self, ConfigError};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";
pub const API_URL_VAR: &str = "SPOTIFY_API_URL";
pub const AUTH_URL_VAR: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL_VAR: &str = "SPOTIFY_API_TOKEN_URL";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Base URLs of the three Spotify services the crate talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Web API root, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// OAuth authorization page.
    pub auth_url: String,
    /// OAuth token exchange endpoint.
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub endpoints: Endpoints,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl Config {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming every required variable that
    /// is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &str| match value(key) {
            Some(v) => v,
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let client_id = required(CLIENT_ID_VAR);
        let client_secret = required(CLIENT_SECRET_VAR);
        let redirect_uri = required(REDIRECT_URI_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let endpoints = Endpoints {
            api_url: value(API_URL_VAR)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: value(AUTH_URL_VAR).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: value(TOKEN_URL_VAR).unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        };

        Ok(Self::new(client_id, client_secret, redirect_uri).with_endpoints(endpoints))
    }
}

/// Loads `.env` files into the process environment.
///
/// The working-directory `.env` is read first, then the one in the local
/// data directory:
/// - Linux: `~/.local/share/genrify/.env`
/// - macOS: `~/Library/Application Support/genrify/.env`
/// - Windows: `%LOCALAPPDATA%/genrify/.env`
///
/// Both files are optional. The data directory is created when missing so
/// users know where to put their credentials.
///
/// # Errors
///
/// Fails when the data directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        load_env_file(&local)?;
    }

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Directory(e.to_string()))?;
    }

    if path.is_file() {
        load_env_file(&path)?;
    }

    Ok(())
}

/// Loads the `.env` files and builds the configuration from the resulting
/// environment.
///
/// # Errors
///
/// `Error::Config` when a `.env` file cannot be read or a required
/// variable is missing.
pub async fn load() -> error::Result<Config> {
    load_env().await?;
    Ok(Config::from_env()?)
}

fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    dotenv::from_path(path)
        .map(|_| ())
        .map_err(|e| ConfigError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("genrify/.env");
    path
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_required_values_only() {
        let config = Config::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://localhost:8080/callback"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "id");
        assert_eq!(config.client_secret, "secret");
        assert_eq!(config.redirect_uri, "http://localhost:8080/callback");
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn test_reports_all_missing_variables() {
        let err = Config::from_lookup(lookup_from(&[(CLIENT_SECRET_VAR, "secret")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec![
                CLIENT_ID_VAR.to_string(),
                REDIRECT_URI_VAR.to_string()
            ])
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "  "),
            (CLIENT_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://localhost:8080/callback"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec![CLIENT_ID_VAR.to_string()]));
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://localhost:8080/callback"),
            (API_URL_VAR, "http://127.0.0.1:9000/v1/"),
            (TOKEN_URL_VAR, "http://127.0.0.1:9000/api/token"),
        ]))
        .unwrap();

        assert_eq!(config.endpoints.api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.endpoints.token_url, "http://127.0.0.1:9000/api/token");
        assert_eq!(config.endpoints.auth_url, DEFAULT_AUTH_URL);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new("id", "super-secret", "http://localhost:8080/callback");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
