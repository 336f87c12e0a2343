//! Feed broadcast server
//!
//! The serving half of the wire: accepts WebSocket clients and fans
//! every payload out to all of them. The simulation demo feeds it at a
//! fixed cadence; the integration tests feed it scripted payloads.
//! Dropping the broadcaster stops the accept loop and closes every
//! client cleanly.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use orrery_core::{OrreryError, OrreryResult};

/// Fan-out depth per client; laggards skip frames rather than block
const FANOUT_BUFFER: usize = 64;

/// WebSocket fan-out server for frame payloads
pub struct FeedBroadcaster {
    local_addr: SocketAddr,
    payloads: broadcast::Sender<String>,
    clients: Arc<AtomicUsize>,
    accept_task: JoinHandle<()>,
}

impl FeedBroadcaster {
    /// Bind a listener and start accepting clients
    pub async fn bind(addr: &str) -> OrreryResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| OrreryError::TransportError(e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| OrreryError::TransportError(e.to_string()))?;

        let (payloads, _) = broadcast::channel(FANOUT_BUFFER);
        let clients = Arc::new(AtomicUsize::new(0));

        let tx = payloads.clone();
        let counter = Arc::clone(&clients);
        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        tracing::info!("feed client connecting: {}", peer);
                        let rx = tx.subscribe();
                        let counter = Arc::clone(&counter);
                        tokio::spawn(async move {
                            serve_client(stream, rx, counter).await;
                            tracing::info!("feed client gone: {}", peer);
                        });
                    }
                    Err(e) => {
                        tracing::warn!("accept error: {}", e);
                    }
                }
            }
        });

        Ok(FeedBroadcaster {
            local_addr,
            payloads,
            clients,
            accept_task,
        })
    }

    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// URL clients can dial
    pub fn url(&self) -> String {
        format!("ws://{}", self.local_addr)
    }

    /// Send one payload to every connected client
    pub fn broadcast(&self, payload: String) {
        // no subscribers yet is fine
        let _ = self.payloads.send(payload);
    }

    /// Clients that have completed the handshake
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }
}

impl Drop for FeedBroadcaster {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn serve_client(
    stream: TcpStream,
    mut payloads: broadcast::Receiver<String>,
    counter: Arc<AtomicUsize>,
) {
    let mut ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!("handshake failed: {}", e);
            return;
        }
    };

    counter.fetch_add(1, Ordering::Relaxed);
    loop {
        tokio::select! {
            payload = payloads.recv() => match payload {
                Ok(text) => {
                    if ws.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("client lagging, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    let _ = ws.close(None).await;
                    break;
                }
            },
            msg = ws.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }
    counter.fetch_sub(1, Ordering::Relaxed);
}
