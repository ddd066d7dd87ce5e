// src/lib.rs

//! Cooperative, allocation-free driver for HC-SR04 ultrasonic distance sensors.
//!
//! A [`Hcsr04Driver`] holds up to `N` named sensors. The host arms sensors with
//! [`Hcsr04Driver::measure_distance_async`] and calls [`Hcsr04Driver::tick`]
//! from its main loop; each tick measures one sensor, round robin. A blocking
//! reading is available through [`Hcsr04Driver::measure_distance`].

#![no_std] // Specify no_std at the crate root

pub mod common;
pub mod driver;
pub mod registry;
pub mod sensor;

// Re-export key types for convenience
pub use common::{
    DebugLevel, DistanceListener, Hcsr04Error, LogSink, MeasureMode, PinLevel, PinWiring, PulseIn,
    SensorContext, TriggerPort, NO_READING,
};
pub use driver::Hcsr04Driver;
pub use registry::{SensorHandle, SensorRegistry, DEFAULT_MAX_SENSORS};
pub use sensor::{Sensor, SensorState};
