// src/common/hal_traits.rs

use super::types::{PinLevel, PinWiring, SensorContext};

/// Measures the width of a pulse on the echo pin.
///
/// `P` is the caller's port handle type, handed back untouched from the
/// sensor's [`PinWiring`].
pub trait PulseIn<P> {
    /// Waits for `level` on the echo pin and returns how long it was held, in
    /// microseconds.
    ///
    /// Implementations must not block for longer than `max_duration_us` and
    /// return 0 when nothing was measured within that bound.
    fn pulse_in(
        &mut self,
        echo: &PinWiring<P>,
        level: PinLevel,
        max_duration_us: u64,
        context: SensorContext<'_>,
    ) -> u64;
}

/// Emits a pulse on the trigger pin.
pub trait TriggerPort<P> {
    /// Drives the trigger pin to `level` for `duration_us` microseconds.
    fn trigger(
        &mut self,
        trigger: &PinWiring<P>,
        level: PinLevel,
        duration_us: u64,
        context: SensorContext<'_>,
    );
}

/// Receives the result of every completed measurement cycle.
///
/// Called synchronously from within the cycle, on the thread driving
/// [`Hcsr04Driver::tick`](crate::driver::Hcsr04Driver::tick) or
/// [`Hcsr04Driver::measure_distance`](crate::driver::Hcsr04Driver::measure_distance).
pub trait DistanceListener {
    fn distance_ready(&self, distance_cm: f32, context: SensorContext<'_>);
}

impl<F> DistanceListener for F
where
    F: Fn(f32, SensorContext<'_>),
{
    fn distance_ready(&self, distance_cm: f32, context: SensorContext<'_>) {
        self(distance_cm, context)
    }
}

/// Destination for textual driver diagnostics.
pub trait LogSink {
    /// Receives one complete line, without line terminator.
    fn write_line(&mut self, line: &str);
}

impl<F> LogSink for F
where
    F: FnMut(&str),
{
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}
