//! Genre playlists from your Spotify library.
//!
//! This library logs a user in to Spotify through the OAuth authorization
//! code flow, fetches their saved tracks, keeps the ones whose primary
//! artist carries a given genre and writes them to a named playlist,
//! creating it when it does not exist yet.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local OAuth callback listener
//! - `cli` - Command implementations used by the binary
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error taxonomy shared by all layers
//! - `management` - Per-attempt authorization session state
//! - `server` - The local callback listener
//! - `spotify` - Spotify Web API client and workflow steps
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use genrify::{config, spotify};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> genrify::Result<()> {
//!     let config = config::load().await?;
//!     let options = spotify::auth::AuthOptions::default();
//!     let client = spotify::auth::authenticate(&config, &options, CancellationToken::new()).await?;
//!     let songs = spotify::library::get_liked_songs(&client).await?;
//!     let ids = spotify::filter::filter_songs_by_genre(&client, &songs, "shoegaze").await?;
//!     spotify::playlist::create_or_update_playlist(&client, "shoegaze playlist", &ids, Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{AuthError, ConfigError, Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a blue "o" indicator followed by the
/// provided message. Used for status updates such as the authorization URL
/// or how many liked songs matched a genre.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Please log in to Spotify by visiting the following page");
/// info!("{} of {} liked songs match genre \"{}\"", matched, total, genre);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser");
/// warning!("Skipping \"{}\": track has no artists", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
