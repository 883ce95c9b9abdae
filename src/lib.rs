//! teleop-link: dual-stick teleoperation client
//!
//! Streams timestamped joystick snapshots to a rover over a persistent
//! WebSocket and keeps the link alive with fixed-delay reconnection. The
//! [`link`] module owns the socket and its state machine, [`input`] tracks the
//! two stick vectors, [`protocol`] builds the wire messages, and [`session`]
//! ties them together.

pub mod cli;
pub mod config;
pub mod input;
pub mod link;
pub mod protocol;
pub mod session;

pub use config::{AppConfig, LinkConfig};
pub use input::{AxisState, AxisVector, ControlChannel};
pub use link::{ConnectionState, LinkManager, StatusCallback};
pub use protocol::{encode, ControlMessage};
pub use session::TeleopSession;
