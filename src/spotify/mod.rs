//! # Spotify Integration Module
//!
//! This module is the layer between the command implementations and the
//! Spotify Web API. It owns the authenticated HTTP client and every request
//! the application makes.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (sync, genres)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Library (saved tracks, paginated)
//!     ├── Artists (genre lookup, memoized per run)
//!     ├── Filter (first-artist genre match)
//!     └── Playlist (find-or-create, append)
//!          ↓
//! HTTP Layer (reqwest, serde_json)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! Every request goes through [`SpotifyClient`], which reads the body as
//! text, turns a non-success status into [`Error::Api`] carrying the status
//! and body, and only then decodes JSON. Nothing is retried: the first error
//! aborts the calling operation and is returned to the caller.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - saved tracks, 50 per page
//! - `GET /artists/{id}` - artist genres
//! - `GET /me` - current user
//! - `GET /users/{user_id}/playlists` - playlist lookup by name
//! - `POST /users/{user_id}/playlists` - playlist creation
//! - `GET /playlists/{playlist_id}/tracks` - existing entries, for `--skip-existing`
//! - `POST /playlists/{playlist_id}/tracks` - append tracks
//! - `POST /api/token` - authorization code exchange

use std::fmt;

use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Error, Result},
    types::Token,
};

pub mod artists;
pub mod auth;
pub mod filter;
pub mod library;
pub mod playlist;

/// An HTTP client bound to one user's access token.
///
/// Produced by the authorization flow and passed by reference to every API
/// operation. Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: Token,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .field("scope", &self.token.scope)
            .finish()
    }
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, token: Token) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Builds a client from a bare access token.
    pub fn with_access_token(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::new(
            Client::new(),
            api_url,
            Token {
                access_token: access_token.into(),
                token_type: "Bearer".to_string(),
                scope: String::new(),
                expires_in: 0,
                refresh_token: None,
            },
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(&self.token.access_token)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .bearer_auth(&self.token.access_token)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.token.access_token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Api { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}
