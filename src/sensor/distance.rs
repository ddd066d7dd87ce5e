// src/sensor/distance.rs

//! Temperature-corrected conversion between echo time and distance.
//!
//! The speed of sound is kept as an integer in cm/µs scaled by 1e12 so the
//! timeout bound is computed without floating point drift.

use crate::common::timing::{
    ROUND_TRIP_SCALE, SOS_BASE_SCALED, SOS_SLOPE_SCALED, TIMEOUT_BOUND_FACTOR,
    TIMEOUT_MARGIN_SCALED,
};
use crate::common::types::NO_READING;

/// Speed of sound at `temperature_c`, in cm/µs scaled by 1e12.
///
/// Temperatures at or below roughly -546 °C (and NaN) give 0.
pub fn speed_of_sound_scaled(temperature_c: f32) -> u64 {
    let sos = SOS_BASE_SCALED as f32 + SOS_SLOPE_SCALED as f32 * temperature_c;
    // `as` saturates: negative and NaN become 0.
    sos as u64
}

/// Expected echo duration for `max_distance_cm`, with a 2.5x margin, in µs.
pub fn max_echo_duration_us(sos_scaled: u64, max_distance_cm: u16) -> u64 {
    TIMEOUT_MARGIN_SCALED
        .checked_div(sos_scaled)
        .unwrap_or(u64::MAX)
        .saturating_mul(u64::from(max_distance_cm))
}

/// Bound handed to the pulse-timing collaborator for one cycle.
pub fn echo_timeout_bound(sos_scaled: u64, max_distance_cm: u16) -> u64 {
    max_echo_duration_us(sos_scaled, max_distance_cm).saturating_mul(TIMEOUT_BOUND_FACTOR)
}

/// One-way distance covered by an echo of `echo_us`.
pub fn echo_to_distance_cm(sos_scaled: u64, echo_us: u64) -> f32 {
    sos_scaled as f32 / ROUND_TRIP_SCALE * echo_us as f32
}

/// Maps readings that cannot be trusted to [`NO_READING`].
pub fn validate_distance(distance_cm: f32, max_distance_cm: u16) -> f32 {
    if distance_cm == 0.0 || distance_cm > f32::from(max_distance_cm) || distance_cm.is_nan() {
        NO_READING
    } else {
        distance_cm
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_of_sound_reference_points() {
        // f32 spacing at this magnitude is 2048.
        let at_0 = speed_of_sound_scaled(0.0);
        assert!((at_0 as i64 - 33_130_000_000).abs() < 10_000);
        let at_20 = speed_of_sound_scaled(20.0);
        assert!((at_20 as i64 - 34_342_000_000).abs() < 10_000);
    }

    #[test]
    fn test_speed_of_sound_saturates() {
        assert_eq!(speed_of_sound_scaled(-1000.0), 0);
        assert_eq!(speed_of_sound_scaled(f32::NAN), 0);
    }

    #[test]
    fn test_max_echo_duration() {
        let sos = speed_of_sound_scaled(20.0);
        // 2.5e12 / 3.4342e10 = 72 (integer division)
        assert_eq!(max_echo_duration_us(sos, 1), 72);
        assert_eq!(max_echo_duration_us(sos, 400), 72 * 400);
        assert_eq!(echo_timeout_bound(sos, 400), 72 * 400 * 1000);
    }

    #[test]
    fn test_max_echo_duration_zero_speed() {
        assert_eq!(max_echo_duration_us(0, 100), u64::MAX);
        assert_eq!(echo_timeout_bound(0, 100), u64::MAX);
    }

    #[test]
    fn test_distance_at_20_degrees() {
        let sos = speed_of_sound_scaled(20.0);
        // 100 cm there and back at 0.034342 cm/us is ~5823.8 us
        let distance = echo_to_distance_cm(sos, 5824);
        assert!((distance - 100.0).abs() < 0.5, "got {}", distance);
    }

    #[test]
    fn test_validate_distance() {
        assert_eq!(validate_distance(0.0, 200), NO_READING);
        assert_eq!(validate_distance(200.5, 200), NO_READING);
        assert_eq!(validate_distance(f32::NAN, 200), NO_READING);
        assert_eq!(validate_distance(200.0, 200), 200.0);
        assert_eq!(validate_distance(12.25, 200), 12.25);
    }
}
