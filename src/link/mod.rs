//! Control link management
//!
//! Owns the WebSocket to the rover, drives the connection state machine with
//! automatic reconnection, and is the only path through which encoded control
//! messages leave the process. Connection state is published read-only to
//! observers; faults are handled entirely in here and never surfaced to
//! callers.

mod connection;

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use parking_lot::{Mutex, RwLock};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use crate::config::LinkConfig;
use crate::protocol::ControlMessage;

/// Write half of the client WebSocket
pub(crate) type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Connection state of the control link
///
/// Exactly one value is current at any instant. The machine is cyclic:
/// `Connecting → Connected → Disconnected → Connecting → …` with no terminal
/// state; the link keeps trying for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A connection attempt is in flight
    Connecting,
    /// Handshake completed; the socket is ready to send
    Connected,
    /// Socket lost or failed to open; a retry is scheduled
    Disconnected,
}

/// Callback type for connection state changes
pub type StatusCallback = Arc<dyn Fn(ConnectionState) + Send + Sync>;

/// Internal fault representation for a lost or failed connection.
///
/// Every variant collapses to the same `Disconnected` transition and the same
/// fixed-delay retry; the distinction only survives into the logs.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LinkError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("peer closed the connection")]
    PeerClosed,
}

/// Manager for the outbound control link
///
/// All fields are shared handles so the manager can be cloned into the
/// background connection task. The socket and state cell are owned exclusively
/// by this type; other components only observe the published state and call
/// [`send`](LinkManager::send).
#[derive(Clone)]
pub struct LinkManager {
    endpoint: Arc<str>,
    reconnect_delay: Duration,

    // Write half of the live socket, if any
    sink: Arc<tokio::sync::Mutex<Option<WsSink>>>,

    // Published connection state
    state: Arc<RwLock<ConnectionState>>,
    status_callbacks: Arc<RwLock<Vec<StatusCallback>>>,

    // Teardown coordination
    shutdown_flag: Arc<Mutex<bool>>,
    shutdown_notify: Arc<Notify>,
}

impl LinkManager {
    /// Create a manager for the configured endpoint; does not connect yet
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            endpoint: Arc::from(config.endpoint.as_str()),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            sink: Arc::new(tokio::sync::Mutex::new(None)),
            state: Arc::new(RwLock::new(ConnectionState::Connecting)),
            status_callbacks: Arc::new(RwLock::new(Vec::new())),
            shutdown_flag: Arc::new(Mutex::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
        }
    }

    /// Endpoint URL this link dials
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state (read-only observation)
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Subscribe to connection state changes
    pub fn subscribe_status(&self, callback: StatusCallback) {
        self.status_callbacks.write().push(callback);
    }

    /// Spawn the background connection task
    ///
    /// The task dials, watches the socket, and re-dials after a fixed delay on
    /// every loss, until [`stop`](LinkManager::stop) is called.
    pub fn start(&self) {
        let link = self.clone();
        tokio::spawn(async move {
            link.run().await;
        });
    }

    /// Transmit a control message, best effort.
    ///
    /// Sends only when the link is `Connected` and a socket write half exists;
    /// otherwise the message is dropped silently. Control commands are
    /// perishable, so there is no queueing and no retry of a dropped one --
    /// the next stick event produces a fresher snapshot anyway.
    pub async fn send(&self, message: &ControlMessage) {
        if self.state() != ConnectionState::Connected {
            trace!("link not connected, dropping control message");
            return;
        }

        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            trace!("no live socket, dropping control message");
            return;
        };

        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize control message: {e}");
                return;
            },
        };

        if let Err(e) = sink.send(Message::Text(json)).await {
            // The read half will observe the same fault and drive the
            // Disconnected transition; nothing to do here.
            debug!("send on control link failed: {e}");
        }
    }

    /// Tear the link down.
    ///
    /// Cancels any pending reconnection wait, closes the live socket exactly
    /// once if one exists, and guarantees no new socket is opened afterwards.
    pub async fn stop(&self) {
        *self.shutdown_flag.lock() = true;
        self.shutdown_notify.notify_waiters();

        if let Some(mut sink) = self.sink.lock().await.take() {
            if let Err(e) = sink.close().await {
                debug!("error closing control link socket: {e}");
            }
        }
        debug!("control link stopped");
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        *self.shutdown_flag.lock()
    }

    /// Publish a state transition to all subscribers
    pub(crate) fn set_state(&self, next: ConnectionState) {
        *self.state.write() = next;
        for callback in self.status_callbacks.read().iter() {
            callback(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::AxisVector;
    use crate::protocol::encode;

    fn test_config() -> LinkConfig {
        LinkConfig {
            endpoint: "ws://127.0.0.1:1/ws".to_string(),
            reconnect_delay_ms: 50,
        }
    }

    #[test]
    fn starts_in_connecting_state() {
        let link = LinkManager::new(&test_config());
        assert_eq!(link.state(), ConnectionState::Connecting);
    }

    #[tokio::test]
    async fn send_without_a_socket_is_a_silent_no_op() {
        let link = LinkManager::new(&test_config());
        link.set_state(ConnectionState::Disconnected);

        // Must neither panic nor error out
        let msg = encode(AxisVector::new(0.5, 0.5), AxisVector::default(), 0);
        link.send(&msg).await;
        assert_eq!(link.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn stop_tolerates_a_missing_socket() {
        let link = LinkManager::new(&test_config());
        link.stop().await;
        assert!(link.is_shutdown());
    }

    #[test]
    fn status_callbacks_observe_transitions() {
        let link = LinkManager::new(&test_config());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_cb = Arc::clone(&seen);
        link.subscribe_status(Arc::new(move |state| {
            seen_cb.lock().push(state);
        }));

        link.set_state(ConnectionState::Connected);
        link.set_state(ConnectionState::Disconnected);
        link.set_state(ConnectionState::Connecting);

        assert_eq!(
            *seen.lock(),
            vec![
                ConnectionState::Connected,
                ConnectionState::Disconnected,
                ConnectionState::Connecting,
            ]
        );
    }
}
