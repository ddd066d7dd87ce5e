// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod debug_log;
pub mod error;
pub mod hal_traits;
pub mod name;
pub mod timing;
pub mod types;

#[cfg(feature = "impl-embedded-hal")]
pub mod hal_adapters;

// --- Re-export key types/traits for easier access ---

// From debug_log.rs
pub use debug_log::DebugLog;

// From error.rs
pub use error::Hcsr04Error;

// From hal_traits.rs
pub use hal_traits::{DistanceListener, LogSink, PulseIn, TriggerPort};

// From name.rs
pub use name::{SensorName, NAME_LEN};

// From types.rs
pub use types::{DebugLevel, MeasureMode, PinLevel, PinWiring, SensorContext, NO_READING};

// --- Feature-gated re-exports ---

#[cfg(feature = "log")]
pub use debug_log::LogFacade;

#[cfg(feature = "impl-embedded-hal")]
pub use hal_adapters::{HalPulseIn, HalTrigger};
