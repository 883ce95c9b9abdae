//! Teleop session: wires stick events to the control link
//!
//! An input event updates the axis state, then a full snapshot of both sticks
//! is encoded and handed to the link. The link decides whether it actually
//! goes out; the session never queues or retries.

use chrono::Utc;

use crate::input::{AxisState, AxisVector, ControlChannel};
use crate::link::{ConnectionState, LinkManager};
use crate::protocol::encode;

/// One teleoperation session: axis state plus the link it feeds
pub struct TeleopSession {
    axes: AxisState,
    link: LinkManager,
}

impl TeleopSession {
    pub fn new(link: LinkManager) -> Self {
        Self {
            axes: AxisState::new(),
            link,
        }
    }

    /// Stick displacement event from the input capability
    pub async fn on_move(&self, channel: ControlChannel, vector: AxisVector) {
        self.axes.update(channel, vector);
        self.send_snapshot().await;
    }

    /// Stick release event: re-center that channel only
    pub async fn on_stop(&self, channel: ControlChannel) {
        self.axes.stop(channel);
        self.send_snapshot().await;
    }

    /// Current vector for a channel, for human-readable feedback only
    pub fn vector(&self, channel: ControlChannel) -> AxisVector {
        self.axes.vector(channel)
    }

    /// Current link state, for human-readable feedback only
    pub fn connection_state(&self) -> ConnectionState {
        self.link.state()
    }

    async fn send_snapshot(&self) {
        let (left, right) = self.axes.snapshot();
        let message = encode(left, right, Utc::now().timestamp_millis());
        self.link.send(&message).await;
    }
}
