use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use reqwest::Client;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use url::{Host, Url};

use crate::{
    config::Config,
    error::AuthError,
    info,
    management::{AuthResult, AuthSession},
    server::{CallbackServer, start_callback_server},
    spotify::SpotifyClient,
    success,
    types::Token,
    warning,
};

/// Permissions requested from the user: reading saved tracks and writing
/// private playlists.
pub const SCOPES: [&str; 2] = ["user-library-read", "playlist-modify-private"];

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// How long to wait for the user to complete the login.
    pub timeout: Duration,
    /// Try to open the authorization URL in the default browser.
    pub open_browser: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOGIN_TIMEOUT,
            open_browser: true,
        }
    }
}

/// Where the callback listener binds, derived from the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub bind_addr: SocketAddr,
    pub path: String,
}

/// An authorization attempt whose listener is running and whose URL is ready
/// to be visited.
pub struct PendingAuthorization {
    authorize_url: Url,
    session: Arc<AuthSession>,
    server: CallbackServer,
    receiver: oneshot::Receiver<AuthResult>,
}

/// Runs the complete authorization-code flow with Spotify.
///
/// 1. Generates a random state token and starts the callback listener on the
///    redirect URI's host and port
/// 2. Prints the authorization URL and tries to open it in the browser
/// 3. Waits until the callback delivers a client, the timeout elapses or
///    `cancel` fires
///
/// The listener is shut down before this function returns, whatever the
/// outcome.
///
/// # Errors
///
/// Any [`AuthError`]: a provider-reported error, a state mismatch, a failed
/// token exchange, an unusable redirect URI, a timeout or a cancellation.
pub async fn authenticate(
    config: &Config,
    options: &AuthOptions,
    cancel: CancellationToken,
) -> Result<SpotifyClient, AuthError> {
    let pending = start(config).await?;

    info!(
        "Please log in to Spotify by visiting the following page in your browser:\n{}",
        pending.authorize_url()
    );

    if options.open_browser && webbrowser::open(pending.authorize_url().as_str()).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }

    let client = pending.wait(options.timeout, cancel).await?;
    success!("Authentication successful!");
    Ok(client)
}

/// Starts an authorization attempt without waiting for it.
///
/// The state token is generated before the listener starts, so the listener
/// can never observe a request for a session that does not exist yet.
///
/// Callers that want to drive the browser step themselves (or test the
/// callback) use this together with [`PendingAuthorization::wait`];
/// [`authenticate`] does both.
///
/// # Arguments
///
/// * `config` - Client credentials, redirect URI and endpoints
///
/// # Returns
///
/// A [`PendingAuthorization`] with the listener already accepting requests.
///
/// # Errors
///
/// - `AuthError::InvalidRedirectUri` when the redirect URI cannot be served
///   locally or the authorization URL cannot be built
/// - `AuthError::Listener` when the address cannot be bound
pub async fn start(config: &Config) -> Result<PendingAuthorization, AuthError> {
    let target = parse_redirect_uri(&config.redirect_uri)?;
    let (session, receiver) = AuthSession::new(config.clone());
    let session = Arc::new(session);

    let authorize_url = build_authorize_url(config, session.state())?;
    let server =
        start_callback_server(Arc::clone(&session), target.bind_addr, &target.path).await?;

    Ok(PendingAuthorization {
        authorize_url,
        session,
        server,
        receiver,
    })
}

impl PendingAuthorization {
    /// URL the user has to visit to grant access.
    pub fn authorize_url(&self) -> &Url {
        &self.authorize_url
    }

    pub fn state(&self) -> &str {
        self.session.state()
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Waits for the callback to decide the attempt.
    ///
    /// Whatever the first callback delivers is returned: an authenticated
    /// client or the error it reported. The listener is shut down before
    /// returning in every case.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Upper bound on the wait
    /// * `cancel` - Token that aborts the wait when cancelled
    ///
    /// # Errors
    ///
    /// - The [`AuthError`] delivered by the callback
    /// - `AuthError::Timeout` when nothing arrives in time
    /// - `AuthError::Cancelled` when `cancel` fires first
    /// - `AuthError::ListenerClosed` when the handoff is dropped unused
    pub async fn wait(
        self,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<SpotifyClient, AuthError> {
        let Self {
            server, receiver, ..
        } = self;

        let result = tokio::select! {
            received = receiver => match received {
                Ok(result) => result,
                Err(_) => Err(AuthError::ListenerClosed),
            },
            _ = tokio::time::sleep(timeout) => Err(AuthError::Timeout(timeout)),
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
        };

        server.shutdown().await;
        result
    }
}

/// Builds the Spotify authorization URL for `state`.
///
/// The URL carries `client_id`, `response_type=code`, `redirect_uri`, the
/// space-separated [`SCOPES`] and `state`. The client secret never appears
/// in it.
///
/// # Errors
///
/// `AuthError::InvalidRedirectUri` when the configured authorization
/// endpoint is not a valid URL.
pub fn build_authorize_url(config: &Config, state: &str) -> Result<Url, AuthError> {
    let scope = SCOPES.join(" ");
    Url::parse_with_params(
        &config.endpoints.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| {
        AuthError::InvalidRedirectUri(format!(
            "cannot build authorization URL from {}: {}",
            config.endpoints.auth_url, e
        ))
    })
}

/// Derives the listener address and route from the redirect URI.
///
/// `localhost` binds the IPv4 loopback address, IP literals bind as given
/// and any other host name binds all interfaces. A URI without a port uses
/// port 80.
///
/// # Errors
///
/// `AuthError::InvalidRedirectUri` when the URI does not parse, is not
/// `http`, has no host, or has a path segment the router would read as a
/// capture or wildcard (`:name`, `*rest`, `{name}`).
pub fn parse_redirect_uri(redirect_uri: &str) -> Result<RedirectTarget, AuthError> {
    let url = Url::parse(redirect_uri)
        .map_err(|e| AuthError::InvalidRedirectUri(format!("{}: {}", redirect_uri, e)))?;

    if url.scheme() != "http" {
        return Err(AuthError::InvalidRedirectUri(format!(
            "{}: only http redirect URIs can be served locally",
            redirect_uri
        )));
    }

    let ip = match url.host() {
        Some(Host::Domain(domain)) if domain.eq_ignore_ascii_case("localhost") => {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
        Some(Host::Domain(_)) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip),
        None => {
            return Err(AuthError::InvalidRedirectUri(format!(
                "{}: missing host",
                redirect_uri
            )));
        }
    };

    let path = url.path();
    if let Some(segment) = path.split('/').find(|segment| is_route_syntax(segment)) {
        return Err(AuthError::InvalidRedirectUri(format!(
            "{}: path segment {:?} cannot be served as a literal route",
            redirect_uri, segment
        )));
    }

    let port = url.port_or_known_default().unwrap_or(80);

    Ok(RedirectTarget {
        bind_addr: SocketAddr::new(ip, port),
        path: path.to_string(),
    })
}

// The router reads these as captures or wildcards and refuses to register them.
fn is_route_syntax(segment: &str) -> bool {
    segment.starts_with(':')
        || segment.starts_with('*')
        || segment.contains(|c| c == '{' || c == '}')
}

/// Exchanges an authorization code for an access token.
///
/// The client credentials are sent with HTTP basic auth; the redirect URI
/// must be the one used for the authorization request.
///
/// # Arguments
///
/// * `http` - Client used for the request
/// * `config` - Credentials, redirect URI and token endpoint
/// * `code` - Authorization code from the callback
///
/// # Returns
///
/// The token response, of which only `access_token` is required.
///
/// # Errors
///
/// `AuthError::TokenExchange` for network failures, a non-success status
/// (message carries status and body) or an undecodable token response.
pub async fn exchange_code(http: &Client, config: &Config, code: &str) -> Result<Token, AuthError> {
    let response = http
        .post(&config.endpoints.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

    if !status.is_success() {
        return Err(AuthError::TokenExchange(format!("{}: {}", status, body)));
    }

    serde_json::from_str(&body)
        .map_err(|e| AuthError::TokenExchange(format!("invalid token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_contains_flow_parameters() {
        let config = Config::new("my-client", "secret", "http://localhost:8080/callback");
        let url = build_authorize_url(&config, "deadbeef").unwrap();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("client_id"), Some("my-client"));
        assert_eq!(get("response_type"), Some("code"));
        assert_eq!(get("redirect_uri"), Some("http://localhost:8080/callback"));
        assert_eq!(
            get("scope"),
            Some("user-library-read playlist-modify-private")
        );
        assert_eq!(get("state"), Some("deadbeef"));
    }

    #[test]
    fn test_authorize_url_never_leaks_secret() {
        let config = Config::new("my-client", "top-secret", "http://localhost:8080/callback");
        let url = build_authorize_url(&config, "deadbeef").unwrap();
        assert!(!url.as_str().contains("top-secret"));
    }

    #[test]
    fn test_redirect_localhost_binds_loopback() {
        let target = parse_redirect_uri("http://localhost:8080/callback").unwrap();
        assert_eq!(target.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(target.path, "/callback");
    }

    #[test]
    fn test_redirect_ip_literal_and_default_port() {
        let target = parse_redirect_uri("http://127.0.0.1/cb").unwrap();
        assert_eq!(target.bind_addr, "127.0.0.1:80".parse().unwrap());
        assert_eq!(target.path, "/cb");

        let target = parse_redirect_uri("http://[::1]:9090/callback").unwrap();
        assert_eq!(target.bind_addr, "[::1]:9090".parse().unwrap());
    }

    #[test]
    fn test_redirect_other_host_binds_all_interfaces() {
        let target = parse_redirect_uri("http://my-box.lan:8888/callback").unwrap();
        assert_eq!(target.bind_addr, "0.0.0.0:8888".parse().unwrap());
    }

    #[test]
    fn test_redirect_rejects_unusable_uris() {
        assert!(matches!(
            parse_redirect_uri("https://localhost:8080/callback"),
            Err(AuthError::InvalidRedirectUri(_))
        ));
        assert!(matches!(
            parse_redirect_uri("not a url"),
            Err(AuthError::InvalidRedirectUri(_))
        ));
    }

    #[test]
    fn test_redirect_rejects_route_syntax_in_path() {
        for uri in [
            "http://127.0.0.1:8080/auth/:cb",
            "http://127.0.0.1:8080/*rest",
            "http://localhost:8080/callback/:id/done",
        ] {
            assert!(
                matches!(parse_redirect_uri(uri), Err(AuthError::InvalidRedirectUri(_))),
                "{} should be rejected",
                uri
            );
        }

        let target = parse_redirect_uri("http://127.0.0.1:8080/auth/cb:v2").unwrap();
        assert_eq!(target.path, "/auth/cb:v2");
    }
}
