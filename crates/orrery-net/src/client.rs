//! WebSocket feed client
//!
//! One `FeedClient` is one connection attempt. A background task owns
//! the socket end to end: it dials, decodes text frames, and reports
//! everything upward as `FeedEvent`s over a bounded channel. A decode
//! failure drops that frame only; the socket stays open. There is no
//! automatic reconnect - whoever owns the client decides when to dial
//! again, and always starts from empty state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use orrery_core::Packet;
use orrery_wire::decode_frame;

/// Event channel depth; a slow consumer stalls only the reader task
pub const EVENT_BUFFER: usize = 256;

/// Close code reported when the peer vanishes without a close frame
pub const ABNORMAL_CLOSE: u16 = 1006;

/// Everything the transport reports upward
#[derive(Debug)]
pub enum FeedEvent {
    /// Socket is open; frames may arrive from here on
    Opened,
    /// One decoded frame, feed order preserved
    Batch(Vec<Packet>),
    /// A frame failed to decode; the connection stays open
    FrameRejected(String),
    /// The connection ended with a close handshake
    Closed { code: u16, reason: String },
    /// Transport failure; terminal for this connection
    Failed(String),
}

/// Handle to a live (or still connecting) feed connection
pub struct FeedClient {
    close_tx: mpsc::Sender<()>,
    open: Arc<AtomicBool>,
}

impl FeedClient {
    /// Spawn the connection task; events arrive on the returned receiver
    ///
    /// Returns immediately. The first event is either `Opened` or
    /// `Failed`; the last is always `Closed` or `Failed`.
    pub fn spawn(address: String) -> (FeedClient, mpsc::Receiver<FeedEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (close_tx, close_rx) = mpsc::channel(1);
        let open = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&open);
        tokio::spawn(async move {
            run_connection(address, event_tx, close_rx, flag).await;
        });

        (FeedClient { close_tx, open }, event_rx)
    }

    /// Is the socket currently open?
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Ask the connection task to close the socket
    pub fn close(&self) {
        let _ = self.close_tx.try_send(());
    }
}

async fn run_connection(
    address: String,
    events: mpsc::Sender<FeedEvent>,
    mut close_rx: mpsc::Receiver<()>,
    open: Arc<AtomicBool>,
) {
    let (mut ws, _) = match connect_async(address.as_str()).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("feed connect failed: {}", e);
            let _ = events.send(FeedEvent::Failed(e.to_string())).await;
            return;
        }
    };

    open.store(true, Ordering::Release);
    tracing::info!("feed connected: {}", address);
    if events.send(FeedEvent::Opened).await.is_err() {
        let _ = ws.close(None).await;
        open.store(false, Ordering::Release);
        return;
    }

    let mut close_frame: Option<(u16, String)> = None;
    let mut fault: Option<String> = None;

    loop {
        tokio::select! {
            _ = close_rx.recv() => {
                let _ = ws.close(None).await;
                // drain until the peer acknowledges or the stream ends
                while let Some(msg) = ws.next().await {
                    if let Ok(Message::Close(frame)) = msg {
                        close_frame = Some(close_details(frame));
                        break;
                    }
                }
                break;
            }
            msg = ws.next() => match msg {
                Some(Ok(Message::Text(text))) => match decode_frame(&text) {
                    Ok(batch) => {
                        if events.send(FeedEvent::Batch(batch)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("frame rejected: {}", e);
                        if events
                            .send(FeedEvent::FrameRejected(e.to_string()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    close_frame = Some(close_details(frame));
                    break;
                }
                // ping/pong/binary carry nothing for us
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    fault = Some(e.to_string());
                    break;
                }
                None => break,
            }
        }
    }

    open.store(false, Ordering::Release);
    if let Some(detail) = fault {
        tracing::warn!("feed transport error: {}", detail);
        let _ = events.send(FeedEvent::Failed(detail)).await;
    } else {
        let (code, reason) = close_frame.unwrap_or((ABNORMAL_CLOSE, String::new()));
        tracing::info!("feed closed: code={} reason={:?}", code, reason);
        let _ = events.send(FeedEvent::Closed { code, reason }).await;
    }
}

fn close_details(frame: Option<CloseFrame<'_>>) -> (u16, String) {
    match frame {
        Some(f) => (u16::from(f.code), f.reason.into_owned()),
        None => (ABNORMAL_CLOSE, String::new()),
    }
}
