//! Error types shared by every layer of the crate.
//!
//! Every operation returns the first error it meets and abandons the rest of
//! its work. Nothing is retried and nothing is accumulated, so an `Error`
//! reaching the command layer always terminates the run.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the OAuth authorization-code flow.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider redirected back with an `error` query parameter.
    #[error("Spotify reported an authorization error: {0}")]
    Provider(String),

    /// The `state` returned by the provider differs from the issued one.
    #[error("State mismatch in authorization callback")]
    StateMismatch,

    #[error("Authorization callback did not contain a code")]
    MissingCode,

    /// The authorization code could not be exchanged for an access token.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(String),

    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    /// The local callback listener could not be bound.
    #[error("Failed to start callback listener: {0}")]
    Listener(#[from] std::io::Error),

    #[error("Timed out after {0:?} waiting for the authorization callback")]
    Timeout(Duration),

    #[error("Authorization was cancelled")]
    Cancelled,

    /// The listener went away without handing off a result.
    #[error("Callback listener closed before authorization completed")]
    ListenerClosed,
}

/// Missing or malformed process configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Failed to prepare configuration directory: {0}")]
    Directory(String),

    #[error("Failed to load {path}: {message}")]
    EnvFile { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network or HTTP-level failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Malformed JSON in a provider response.
    #[error("Failed to decode Spotify response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-success status returned by the provider.
    #[error("Spotify API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
