use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    error::AuthError, management::AuthSession, spotify::SpotifyClient,
    spotify::auth::exchange_code, warning,
};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    State(session): State<Arc<AuthSession>>,
) -> (StatusCode, String) {
    // Only the first callback decides the outcome; later ones never reach the token endpoint.
    let Some(handoff) = session.claim().await else {
        return (
            StatusCode::CONFLICT,
            "Login was already handled. You can close this window.".to_string(),
        );
    };

    if let Some(error) = params.error {
        let message = format!("Error from Spotify: {}", error);
        handoff.deliver(Err(AuthError::Provider(error)));
        return (StatusCode::BAD_REQUEST, message);
    }

    if !session.matches_state(params.state.as_deref()) {
        handoff.deliver(Err(AuthError::StateMismatch));
        return (StatusCode::BAD_REQUEST, "State mismatch".to_string());
    }

    let Some(code) = params.code else {
        handoff.deliver(Err(AuthError::MissingCode));
        return (StatusCode::BAD_REQUEST, "Missing authorization code".to_string());
    };

    match exchange_code(session.http(), session.config(), &code).await {
        Ok(token) => {
            let client = SpotifyClient::new(
                session.http().clone(),
                session.config().endpoints.api_url.clone(),
                token,
            );
            if !handoff.deliver(Ok(client)) {
                warning!("Authorization completed after the login wait had ended.");
            }
            (StatusCode::OK, "Login Completed!".to_string())
        }
        Err(e) => {
            let message = format!("Failed to exchange token: {}", e);
            handoff.deliver(Err(e));
            (StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}
