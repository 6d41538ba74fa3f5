use reqwest::Client;
use tokio::sync::{Mutex, oneshot};

use crate::{config::Config, error::AuthError, spotify::SpotifyClient, utils};

pub type AuthResult = Result<SpotifyClient, AuthError>;

/// State of a single authorization attempt.
///
/// Created when the flow starts, handed to the callback listener at
/// construction and dropped with it. The handoff slot can be claimed once;
/// whoever claims it decides the outcome of the attempt.
pub struct AuthSession {
    state: String,
    config: Config,
    http: Client,
    handoff: Mutex<Option<oneshot::Sender<AuthResult>>>,
}

/// Exclusive right to deliver the outcome of an [`AuthSession`].
pub struct Handoff(oneshot::Sender<AuthResult>);

impl AuthSession {
    pub fn new(config: Config) -> (Self, oneshot::Receiver<AuthResult>) {
        Self::with_state(config, utils::generate_state())
    }

    pub fn with_state(config: Config, state: String) -> (Self, oneshot::Receiver<AuthResult>) {
        let (tx, rx) = oneshot::channel();
        let session = Self {
            state,
            config,
            http: Client::new(),
            handoff: Mutex::new(Some(tx)),
        };
        (session, rx)
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn matches_state(&self, candidate: Option<&str>) -> bool {
        candidate == Some(self.state.as_str())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Takes the handoff slot. Returns `None` once it has been taken.
    pub async fn claim(&self) -> Option<Handoff> {
        self.handoff.lock().await.take().map(Handoff)
    }
}

impl Handoff {
    /// Delivers the outcome. Returns `false` if nobody is waiting anymore.
    pub fn deliver(self, result: AuthResult) -> bool {
        self.0.send(result).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (AuthSession, oneshot::Receiver<AuthResult>) {
        let config = Config::new("id", "secret", "http://127.0.0.1:8080/callback");
        AuthSession::with_state(config, "abc123".to_string())
    }

    #[test]
    fn test_state_must_match_exactly() {
        let (session, _rx) = session();
        assert!(session.matches_state(Some("abc123")));
        assert!(!session.matches_state(Some("ABC123")));
        assert!(!session.matches_state(Some("")));
        assert!(!session.matches_state(None));
    }

    #[tokio::test]
    async fn test_slot_can_be_claimed_once() {
        let (session, rx) = session();

        let first = session.claim().await;
        assert!(first.is_some());
        assert!(session.claim().await.is_none());

        assert!(first.unwrap().deliver(Err(AuthError::StateMismatch)));
        assert!(matches!(rx.await, Ok(Err(AuthError::StateMismatch))));
    }

    #[tokio::test]
    async fn test_deliver_without_receiver() {
        let (session, rx) = session();
        drop(rx);
        let handoff = session.claim().await.unwrap();
        assert!(!handoff.deliver(Err(AuthError::Cancelled)));
    }

    #[test]
    fn test_new_sessions_use_fresh_state() {
        let config = Config::new("id", "secret", "http://127.0.0.1:8080/callback");
        let (a, _) = AuthSession::new(config.clone());
        let (b, _) = AuthSession::new(config);
        assert_ne!(a.state(), b.state());
    }
}
