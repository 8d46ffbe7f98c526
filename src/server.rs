//! One-shot local HTTP listener that catches the OAuth redirect.

use std::{future::Future, io, time::Duration};

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio::{net::TcpListener, sync::oneshot, time::timeout};

use crate::api::{self, CallbackSlot};

/// How long open connections may keep the server alive once the code is in.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Source of the single redirect request that ends an authorization attempt.
///
/// `receive` consumes the receiver: whatever transport it owns is released
/// before the returned future completes, on success and on failure.
pub trait CallbackReceiver {
    /// Waits for the first request on `path` and yields its `code` query
    /// parameter, or `None` when the request carried none. Requests to other
    /// paths do not resolve the wait.
    fn receive(self, path: &str) -> impl Future<Output = io::Result<Option<String>>> + Send;
}

/// Callback receiver backed by a real loopback socket.
pub struct CallbackServer {
    listener: TcpListener,
}

impl CallbackServer {
    /// Binds to the host and port named by the redirect URI.
    pub async fn bind(redirect_uri: &Url) -> io::Result<Self> {
        let host = redirect_uri.host_str().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "redirect URI has no host")
        })?;
        let port = redirect_uri.port_or_known_default().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "redirect URI has no port")
        })?;

        // IPv6 literals come back bracketed from the URL parser
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let listener = TcpListener::bind((host, port)).await?;
        Ok(Self { listener })
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener }
    }
}

impl CallbackReceiver for CallbackServer {
    async fn receive(self, path: &str) -> io::Result<Option<String>> {
        let (tx, rx) = oneshot::channel::<Option<String>>();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let app = Router::new()
            .route(path, get(api::callback))
            .layer(Extension(CallbackSlot::new(tx)));

        let mut server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        // The sender lives in the router, so `rx` also fails if the server
        // task ends without a matching request.
        let received = rx.await;
        let _ = stop_tx.send(());

        // Other connections get a short grace period to finish; a stalled one
        // must not hold the code back.
        let served = match timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(joined) => joined.map_err(io::Error::other)?,
            Err(_) => {
                server.abort();
                let _ = server.await;
                Ok(())
            }
        };

        match received {
            Ok(code) => Ok(code),
            Err(_) => {
                served?;
                Err(io::Error::new(
                    io::ErrorKind::ConnectionAborted,
                    "callback server stopped before a redirect arrived",
                ))
            }
        }
    }
}
