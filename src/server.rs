use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{api, error::AuthError, management::AuthSession, warning};

const HEALTH_PATH: &str = "/health";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Handle to the running callback listener.
pub struct CallbackServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

pub async fn start_callback_server(
    session: Arc<AuthSession>,
    addr: SocketAddr,
    callback_path: &str,
) -> Result<CallbackServer, AuthError> {
    let mut app = Router::new().route(callback_path, get(api::callback));
    // The redirect URI owns its path even when it collides with the probe.
    if callback_path != HEALTH_PATH {
        app = app.route(HEALTH_PATH, get(api::health));
    }
    let app = app.with_state(session);

    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.cancelled().await })
            .await
        {
            warning!("Callback listener stopped: {}", e);
        }
    });

    Ok(CallbackServer {
        local_addr,
        shutdown,
        handle,
    })
}

impl CallbackServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits briefly for in-flight requests.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.handle)
            .await
            .is_err()
        {
            warning!("Callback listener did not stop within {:?}", SHUTDOWN_GRACE);
        }
    }
}
