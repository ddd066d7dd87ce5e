// src/common/timing.rs

// Speed of sound in air: c ≈ 331.3 + 0.606 * θ m/s.
// The driver keeps it as cm/µs scaled by 1e12, i.e. 0.03313 cm/µs -> 33_130_000_000.

/// Speed of sound at 0 °C in cm/µs, scaled by 1e12.
pub const SOS_BASE_SCALED: u64 = 33_130_000_000;
/// Speed of sound change per °C in cm/µs, scaled by 1e12.
pub const SOS_SLOPE_SCALED: u64 = 60_600_000;

/// Numerator of the echo timeout: a 2.5x margin over the round trip, scaled by 1e12.
pub const TIMEOUT_MARGIN_SCALED: u64 = 2_500_000_000_000;

/// Factor applied to the expected echo duration to get the bound handed to
/// the pulse-timing collaborator.
pub const TIMEOUT_BOUND_FACTOR: u64 = 1000;

/// Divisor converting `sos * echo_us` back to centimetres: halves the round
/// trip and removes the 1e12 scale.
pub const ROUND_TRIP_SCALE: f32 = 2_000_000_000_000.0;

/// Width of the trigger pulse that starts a measurement.
pub const TRIGGER_PULSE_US: u64 = 10;

/// Capacity of a single formatted debug line.
pub const LOG_LINE_LEN: usize = 64;
