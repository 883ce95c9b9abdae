//! Wire protocol for the control link
//!
//! The link carries exactly one message shape, client to server: a full
//! snapshot of both sticks with an epoch-millisecond timestamp. A snapshot is
//! built from the complete current state even when only one stick moved, so
//! the receiver never has to merge deltas.

use serde::{Deserialize, Serialize};

use crate::input::AxisVector;

/// Fractional digits kept on each axis component
const AXIS_PRECISION: i32 = 5;

/// Control message as it appears on the wire
///
/// Serializes as `{"type":"joystick_data","timestamp":...,"left":{...},"right":{...}}`
/// with no extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    JoystickData {
        /// Epoch milliseconds at encode time
        timestamp: i64,
        left: AxisVector,
        right: AxisVector,
    },
}

/// Round one axis component for the wire.
///
/// Ties round half away from zero (`f64::round` semantics), matching the
/// reference client's 5-digit formatting. Non-finite inputs are coerced to
/// zero rather than leaking NaN/Inf into the JSON.
fn round_component(value: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = 10f64.powi(AXIS_PRECISION);
    (value * scale).round() / scale
}

fn round_vector(v: AxisVector) -> AxisVector {
    AxisVector::new(round_component(v.x), round_component(v.y))
}

/// Build a snapshot message from the two current stick vectors.
///
/// Pure given the vectors and the timestamp; the caller supplies the clock
/// (`chrono::Utc::now().timestamp_millis()` in live traffic).
pub fn encode(left: AxisVector, right: AxisVector, timestamp: i64) -> ControlMessage {
    ControlMessage::JoystickData {
        timestamp,
        left: round_vector(left),
        right: round_vector(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(msg: &ControlMessage) -> (i64, AxisVector, AxisVector) {
        let ControlMessage::JoystickData { timestamp, left, right } = msg;
        (*timestamp, *left, *right)
    }

    #[test]
    fn rounds_to_five_digits() {
        let msg = encode(AxisVector::new(0.123456, 0.654321), AxisVector::default(), 0);
        let (_, left, _) = fields(&msg);
        assert_eq!(left.x, 0.12346);
        assert_eq!(left.y, 0.65432);
    }

    #[test]
    fn keeps_sign_at_the_rounding_boundary() {
        let msg = encode(AxisVector::new(-0.000001, 0.0), AxisVector::default(), 0);
        let json = serde_json::to_string(&msg).unwrap();
        // -0.000001 rounds to negative zero; the sign survives encoding
        assert!(json.contains("\"x\":-0.0"), "json was: {json}");
    }

    #[test]
    fn coerces_non_finite_components_to_zero() {
        let msg = encode(
            AxisVector::new(f64::NAN, f64::INFINITY),
            AxisVector::new(f64::NEG_INFINITY, 0.5),
            0,
        );
        let (_, left, right) = fields(&msg);
        assert_eq!(left, AxisVector::new(0.0, 0.0));
        assert_eq!(right, AxisVector::new(0.0, 0.5));
    }

    #[test]
    fn wire_shape_matches_the_receiver_contract() {
        let msg = encode(
            AxisVector::new(0.5, -0.5),
            AxisVector::new(1.0, 0.0),
            1700000000123,
        );
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"joystick_data","timestamp":1700000000123,"left":{"x":0.5,"y":-0.5},"right":{"x":1.0,"y":0.0}}"#
        );
    }

    #[test]
    fn encode_is_deterministic() {
        let left = AxisVector::new(0.333333333, -0.666666666);
        let right = AxisVector::new(0.1, 0.2);
        assert_eq!(encode(left, right, 42), encode(left, right, 42));
    }

    proptest! {
        #[test]
        fn rounded_components_stay_close_and_stable(
            x in -1.0f64..=1.0,
            y in -1.0f64..=1.0,
        ) {
            let msg = encode(AxisVector::new(x, y), AxisVector::default(), 0);
            let (_, left, _) = fields(&msg);

            // Within half a step of the 5-digit grid (plus fp slack)
            prop_assert!((left.x - x).abs() <= 6e-6);
            prop_assert!((left.y - y).abs() <= 6e-6);

            // Re-rounding changes nothing
            let again = encode(left, AxisVector::default(), 0);
            let (_, left_again, _) = fields(&again);
            prop_assert_eq!(left, left_again);
        }
    }
}
