// src/common/error.rs

/// Failures reported by registry and arming operations.
///
/// A missing or out-of-range echo is not an error: it is reported through the
/// normal path as the [`NO_READING`](crate::common::types::NO_READING) sentinel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hcsr04Error {
    /// Sensor name was empty.
    #[error("Invalid sensor name")]
    InvalidName,

    /// No sensor is registered under the given name.
    #[error("Sensor not found")]
    NotFound,

    /// A sensor with the same (truncated) name is already registered.
    #[error("Sensor name already registered")]
    DuplicateName,

    /// Every slot of the registry is in use.
    #[error("Sensor capacity exhausted: {capacity} slots in use")]
    CapacityExhausted { capacity: usize },
}
