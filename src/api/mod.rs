//! # API Module
//!
//! HTTP endpoints served by the local callback listener during login.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's OAuth redirect. Validates the `state`
//!   parameter against the current [`AuthSession`](crate::management::AuthSession),
//!   exchanges the authorization code for a token and hands the resulting
//!   client to the waiting login flow. Responds `200 "Login Completed!"` on
//!   success, `400` on a provider error, state mismatch or missing code,
//!   `500` when the token exchange fails and `409` once the session has
//!   already been decided.
//! - [`health`] - Reports that the listener is up, with the crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use genrify::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .with_state(session);
//! ```

mod callback;
mod health;

pub use callback::CallbackParams;
pub use callback::callback;
pub use health::health;
