//! # CLI Module
//!
//! Command implementations behind the `genrify` binary. Each command loads
//! the configuration, logs in through the browser and then drives the
//! Spotify workflow, reporting progress with the console macros.
//!
//! ## Commands
//!
//! - [`sync`] - Fetches liked songs, keeps those whose first artist carries
//!   the genre and appends them to the named playlist, creating it if needed
//! - [`genres`] - Shows the most common first-artist genres in the library,
//!   to help pick one for `sync`
//!
//! ## Error Handling
//!
//! Commands are the only place where errors end the process: every failure
//! returned by the library is printed with [`error!`](crate::error!) and the
//! program exits with status 1.
//!
//! ## Usage
//!
//! ```bash
//! genrify genres --top 10
//! genrify sync --genre shoegaze
//! genrify sync --genre "dream pop" --name "Dreamy" --skip-existing
//! ```

mod auth;
mod genres;
mod sync;

pub use genres::genres;
pub use sync::sync;
