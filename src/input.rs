//! Joystick axis state shared between the input source and the encoder
//!
//! Stores the most recent normalized vector for each stick. The upstream
//! widget (or the REPL in this binary) delivers values already normalized to
//! [-1.0, 1.0]; this module only does the bookkeeping.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Control channel identifier for the two independent sticks
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ControlChannel {
    Left,
    Right,
}

/// Normalized 2-D stick vector
///
/// Both components live in [-1.0, 1.0]; the zero vector means centered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisVector {
    pub x: f64,
    pub y: f64,
}

impl AxisVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Last-known vector per channel
///
/// Both vectors sit behind one lock so a snapshot can never observe a
/// half-updated pair while the other channel is being written.
#[derive(Debug, Default)]
pub struct AxisState {
    sticks: RwLock<(AxisVector, AxisVector)>,
}

impl AxisState {
    /// Create with both sticks centered
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored vector for one channel, leaving the other untouched
    pub fn update(&self, channel: ControlChannel, vector: AxisVector) {
        let mut sticks = self.sticks.write();
        match channel {
            ControlChannel::Left => sticks.0 = vector,
            ControlChannel::Right => sticks.1 = vector,
        }
    }

    /// Re-center one channel (stick released); idempotent
    pub fn stop(&self, channel: ControlChannel) {
        self.update(channel, AxisVector::default());
    }

    /// Consistent (left, right) pair for encoding or display
    pub fn snapshot(&self) -> (AxisVector, AxisVector) {
        *self.sticks.read()
    }

    /// Current vector for a single channel
    pub fn vector(&self, channel: ControlChannel) -> AxisVector {
        let sticks = self.sticks.read();
        match channel {
            ControlChannel::Left => sticks.0,
            ControlChannel::Right => sticks.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered() {
        let axes = AxisState::new();
        assert_eq!(axes.snapshot(), (AxisVector::default(), AxisVector::default()));
    }

    #[test]
    fn channels_are_independent() {
        let axes = AxisState::new();
        axes.update(ControlChannel::Left, AxisVector::new(0.5, -0.5));
        axes.update(ControlChannel::Right, AxisVector::new(1.0, 0.0));

        assert_eq!(axes.vector(ControlChannel::Left), AxisVector::new(0.5, -0.5));
        assert_eq!(axes.vector(ControlChannel::Right), AxisVector::new(1.0, 0.0));
    }

    #[test]
    fn stop_zeroes_only_the_given_channel() {
        let axes = AxisState::new();
        axes.update(ControlChannel::Left, AxisVector::new(0.3, 0.7));
        axes.update(ControlChannel::Right, AxisVector::new(-0.2, 0.9));

        axes.stop(ControlChannel::Left);

        assert_eq!(axes.vector(ControlChannel::Left), AxisVector::default());
        assert_eq!(axes.vector(ControlChannel::Right), AxisVector::new(-0.2, 0.9));
    }

    #[test]
    fn stop_is_idempotent() {
        let axes = AxisState::new();
        axes.update(ControlChannel::Left, AxisVector::new(0.3, 0.7));

        axes.stop(ControlChannel::Left);
        let once = axes.snapshot();
        axes.stop(ControlChannel::Left);
        let twice = axes.snapshot();

        assert_eq!(once, twice);
    }

    #[test]
    fn update_replaces_previous_vector() {
        let axes = AxisState::new();
        axes.update(ControlChannel::Right, AxisVector::new(0.1, 0.1));
        axes.update(ControlChannel::Right, AxisVector::new(0.8, -0.4));

        assert_eq!(axes.vector(ControlChannel::Right), AxisVector::new(0.8, -0.4));
    }
}
