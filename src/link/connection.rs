//! Connection task: dialing, fault detection, and fixed-delay reconnection
//!
//! The retry interval is deliberately constant -- no backoff growth and no
//! attempt cap. Control commands are perishable, so the link favors a
//! predictable short outage over a growing one.

use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use super::{ConnectionState, LinkError, LinkManager};

type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

impl LinkManager {
    /// Connection loop, run on its own task until teardown.
    ///
    /// Each cycle: publish `Connecting`, dial, and on success hold the socket
    /// open until it faults. Open failure, peer close, and transport error all
    /// collapse to the same `Disconnected` transition followed by exactly one
    /// retry after the configured delay.
    pub(crate) async fn run(self) {
        loop {
            if self.is_shutdown() {
                break;
            }

            self.set_state(ConnectionState::Connecting);
            debug!("dialing control link at {}", self.endpoint());

            match connect_async(self.endpoint()).await {
                Ok((mut stream, response)) => {
                    debug!(status = %response.status(), "websocket handshake complete");

                    // Teardown may race the dial. Publish the fresh socket
                    // under the sink lock with a shutdown re-check, so stop()
                    // either finds the sink to close or the flag is already
                    // visible here and the fresh socket is closed and dropped.
                    let source = {
                        let mut guard = self.sink.lock().await;
                        if self.is_shutdown() {
                            debug!("link stopped during dial, discarding fresh socket");
                            if let Err(e) = stream.close(None).await {
                                debug!("error closing discarded socket: {e}");
                            }
                            None
                        } else {
                            let (sink, source) = stream.split();
                            *guard = Some(sink);
                            self.set_state(ConnectionState::Connected);
                            Some(source)
                        }
                    };
                    let Some(source) = source else { break };
                    info!("control link connected to {}", self.endpoint());

                    let fault = watch_socket(source).await;
                    debug!("control link lost: {fault}");

                    // Drop the stale write half; a fresh one arrives with the
                    // next successful dial.
                    self.sink.lock().await.take();
                },
                Err(e) => {
                    debug!("control link dial failed: {e}");
                },
            }

            if self.is_shutdown() {
                break;
            }

            self.set_state(ConnectionState::Disconnected);
            warn!(
                "control link down, retrying in {}ms",
                self.reconnect_delay.as_millis()
            );

            // Cancellable retry wait: teardown wakes the notify so no new
            // socket is opened once the owning context is gone.
            tokio::select! {
                _ = sleep(self.reconnect_delay) => {},
                _ = self.shutdown_notify.notified() => break,
            }
        }

        debug!("control link task finished");
    }
}

/// Drain the read half until the socket faults.
///
/// The protocol is client-to-server only, so inbound frames carry no meaning;
/// they are logged at trace and discarded. Returns the fault that ended the
/// connection.
async fn watch_socket(mut source: WsSource) -> LinkError {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Close(_)) => return LinkError::PeerClosed,
            Ok(other) => trace!("ignoring inbound frame: {other:?}"),
            Err(e) => return LinkError::Transport(e),
        }
    }
    LinkError::PeerClosed
}
