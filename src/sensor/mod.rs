// src/sensor/mod.rs

// Entity state lives here; the per-cycle logic is in `engine`, the arithmetic in `distance`.
pub mod distance;
mod engine;

use crate::common::{
    hal_traits::DistanceListener,
    name::SensorName,
    types::{MeasureMode, PinWiring, SensorContext},
};
use core::fmt;

/// Everything about a sensor that changes after registration.
///
/// Kept `Copy` so a synchronous measurement can snapshot and restore it.
#[derive(Copy, Clone, Default)]
pub struct SensorState<'a> {
    /// Due for a measurement cycle.
    pub enabled: bool,
    /// `None` until the sensor has been armed once.
    pub mode: Option<MeasureMode>,
    pub temperature_c: f32,
    pub max_distance_cm: u16,
    pub context: SensorContext<'a>,
    pub listener: Option<&'a dyn DistanceListener>,
}

impl fmt::Debug for SensorState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorState")
            .field("enabled", &self.enabled)
            .field("mode", &self.mode)
            .field("temperature_c", &self.temperature_c)
            .field("max_distance_cm", &self.max_distance_cm)
            .field("context", &self.context)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// One physical HC-SR04: fixed wiring plus its measurement state.
#[derive(Debug)]
pub struct Sensor<'a, P> {
    name: SensorName,
    trigger: PinWiring<P>,
    echo: PinWiring<P>,
    state: SensorState<'a>,
}

impl<'a, P> Sensor<'a, P> {
    /// A disabled sensor with unset mode and no listener.
    pub fn new(name: SensorName, trigger: PinWiring<P>, echo: PinWiring<P>) -> Self {
        Sensor {
            name,
            trigger,
            echo,
            state: SensorState::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &SensorName {
        &self.name
    }

    #[inline]
    pub fn trigger_wiring(&self) -> &PinWiring<P> {
        &self.trigger
    }

    #[inline]
    pub fn echo_wiring(&self) -> &PinWiring<P> {
        &self.echo
    }

    #[inline]
    pub fn state(&self) -> &SensorState<'a> {
        &self.state
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    #[inline]
    pub fn mode(&self) -> Option<MeasureMode> {
        self.state.mode
    }

    /// Arms the sensor with a full measurement configuration.
    pub fn arm(
        &mut self,
        mode: MeasureMode,
        temperature_c: f32,
        max_distance_cm: u16,
        listener: Option<&'a dyn DistanceListener>,
        context: SensorContext<'a>,
    ) {
        self.state = SensorState {
            enabled: true,
            mode: Some(mode),
            temperature_c,
            max_distance_cm,
            context,
            listener,
        };
    }

    /// Prevents further cycles. Configuration is kept.
    pub fn stop(&mut self) {
        self.state.enabled = false;
    }

    pub(crate) fn snapshot(&self) -> SensorState<'a> {
        self.state
    }

    pub(crate) fn restore(&mut self, state: SensorState<'a>) {
        self.state = state;
    }

    /// Enables the sensor for one cycle with new environment parameters,
    /// keeping its mode, listener and context.
    pub(crate) fn force_arm(&mut self, temperature_c: f32, max_distance_cm: u16) {
        self.state.temperature_c = temperature_c;
        self.state.max_distance_cm = max_distance_cm;
        self.state.enabled = true;
    }
}
