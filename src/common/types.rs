// src/common/types.rs

use core::any::Any;
use core::fmt;

/// Distance reported when no valid echo was measured (timeout or out of range).
pub const NO_READING: f32 = -1.0;

// --- Measurement configuration ---

/// What happens to an armed sensor after a completed cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasureMode {
    /// Disarm after one cycle.
    #[default]
    Oneshot,
    /// Stay armed until explicitly stopped.
    Continuous,
}

/// Verbosity of driver diagnostics handed to the [`LogSink`](super::hal_traits::LogSink).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebugLevel {
    #[default]
    Disabled = 0,
    Info,
}

/// Logic level on a trigger or echo pin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    #[inline]
    pub const fn is_high(&self) -> bool {
        matches!(self, PinLevel::High)
    }
}

// --- Wiring ---

/// One pin of a sensor: an opaque port handle plus a pin index on that port.
///
/// The driver never interprets `port`; it only hands it back to the
/// collaborators.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinWiring<P> {
    pub port: P,
    pub pin: u16,
}

impl<P> PinWiring<P> {
    pub const fn new(port: P, pin: u16) -> Self {
        PinWiring { port, pin }
    }
}

// --- User context ---

/// Borrowed, type-erased user context passed through to every collaborator
/// call and to the distance listener.
///
/// The driver only stores the reference; the caller keeps ownership and must
/// keep the value alive for as long as the sensor is armed with it.
#[derive(Copy, Clone, Default)]
pub struct SensorContext<'a>(Option<&'a (dyn Any + 'static)>);

impl SensorContext<'static> {
    /// A context carrying nothing.
    pub const NONE: Self = SensorContext(None);
}

impl<'a> SensorContext<'a> {
    pub fn new<T: Any>(value: &'a T) -> Self {
        SensorContext(Some(value))
    }

    /// Returns the context as `T` if it was created from a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.0.and_then(|value| value.downcast_ref::<T>())
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for SensorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("SensorContext(..)"),
            None => f.write_str("SensorContext(None)"),
        }
    }
}
