// src/driver/mod.rs

use crate::common::{
    debug_log::DebugLog,
    error::Hcsr04Error,
    hal_traits::{DistanceListener, LogSink, PulseIn, TriggerPort},
    types::{DebugLevel, MeasureMode, PinWiring, SensorContext, NO_READING},
};
use crate::registry::{SensorHandle, SensorRegistry, DEFAULT_MAX_SENSORS};
use crate::sensor::Sensor;

/// Cooperative driver for up to `N` HC-SR04 sensors.
///
/// Owns the pulse-timing and trigger collaborators and a fixed-capacity
/// registry. Nothing runs on its own: the host calls [`tick`](Self::tick)
/// from its main loop (one sensor per call) or [`measure_distance`](Self::measure_distance)
/// for a blocking one-off reading.
///
/// Listeners, contexts and the log sink are borrowed for `'a`; the caller
/// keeps ownership.
pub struct Hcsr04Driver<'a, P, PI, TR, const N: usize = DEFAULT_MAX_SENSORS> {
    pulse_in: PI,
    trigger: TR,
    registry: SensorRegistry<'a, P, N>,
    /// Next arena slot the round robin probes.
    cursor: usize,
    log: DebugLog<'a>,
}

impl<'a, P, PI, TR, const N: usize> Hcsr04Driver<'a, P, PI, TR, N>
where
    PI: PulseIn<P>,
    TR: TriggerPort<P>,
{
    pub fn new(pulse_in: PI, trigger: TR) -> Self {
        Hcsr04Driver {
            pulse_in,
            trigger,
            registry: SensorRegistry::new(),
            cursor: 0,
            log: DebugLog::new(),
        }
    }

    // --- Registry ---

    /// Registers a sensor. It starts disabled, with no mode and no listener.
    pub fn create(
        &mut self,
        name: &str,
        trigger: PinWiring<P>,
        echo: PinWiring<P>,
    ) -> Result<SensorHandle, Hcsr04Error> {
        let handle = self.registry.create(name, trigger, echo)?;
        if let Some(sensor) = self.registry.get(handle) {
            self.log.info(format_args!("Sensor \"{}\": registered", sensor.name()));
        }
        Ok(handle)
    }

    /// Removes a sensor. Removing an unknown name succeeds without effect.
    ///
    /// The round robin continues with the next remaining sensor.
    pub fn delete(&mut self, name: &str) -> Result<(), Hcsr04Error> {
        if let Some(sensor) = self.registry.delete(name)? {
            self.log.info(format_args!("Sensor \"{}\": deleted", sensor.name()));
        }
        if self.registry.is_empty() {
            self.cursor = 0;
        }
        Ok(())
    }

    #[inline]
    pub fn find(&self, name: &str) -> Option<SensorHandle> {
        self.registry.find(name)
    }

    #[inline]
    pub fn sensor(&self, handle: SensorHandle) -> Option<&Sensor<'a, P>> {
        self.registry.get(handle)
    }

    #[inline]
    pub fn sensor_by_name(&self, name: &str) -> Option<&Sensor<'a, P>> {
        self.registry.get_by_name(name)
    }

    #[inline]
    pub fn registry(&self) -> &SensorRegistry<'a, P, N> {
        &self.registry
    }

    // --- Measurement control ---

    /// Arms a sensor; the measurement happens on a later [`tick`](Self::tick).
    ///
    /// `listener` is called with the distance (or [`NO_READING`]) and
    /// `context` after every cycle of this sensor.
    pub fn measure_distance_async(
        &mut self,
        name: &str,
        mode: MeasureMode,
        temperature_c: f32,
        max_distance_cm: u16,
        listener: Option<&'a dyn DistanceListener>,
        context: SensorContext<'a>,
    ) -> Result<(), Hcsr04Error> {
        let sensor = self.lookup_mut(name)?;
        sensor.arm(mode, temperature_c, max_distance_cm, listener, context);
        Ok(())
    }

    /// Stops further cycles of a sensor. A cycle already in progress is not
    /// interrupted.
    pub fn stop_continuous_measure(&mut self, name: &str) -> Result<(), Hcsr04Error> {
        self.lookup_mut(name)?.stop();
        Ok(())
    }

    /// Measures right away and returns the distance in cm, or [`NO_READING`]
    /// for an unknown sensor, a timeout or an out-of-range echo.
    ///
    /// The sensor keeps its mode, listener and context for this one cycle.
    /// Afterwards its full state is restored, so whatever the round robin
    /// was doing with it continues unchanged.
    pub fn measure_distance(&mut self, name: &str, temperature_c: f32, max_distance_cm: u16) -> f32 {
        let Some(sensor) = self.registry.get_by_name_mut(name) else {
            return NO_READING;
        };

        let snapshot = sensor.snapshot();
        sensor.force_arm(temperature_c, max_distance_cm);
        let distance = sensor.run_cycle(&mut self.pulse_in, &mut self.trigger, &mut self.log);
        sensor.restore(snapshot);

        distance
    }

    /// Runs one cycle for the next sensor in slot order and advances the
    /// round robin. Disabled sensors are visited without measuring.
    pub fn tick(&mut self) {
        let Some(index) = self.registry.next_occupied(self.cursor) else {
            self.cursor = 0;
            return;
        };

        if let Some(sensor) = self.registry.sensor_at_mut(index) {
            sensor.run_cycle(&mut self.pulse_in, &mut self.trigger, &mut self.log);
        }

        // At least one slot exists once `next_occupied` found one.
        self.cursor = (index + 1) % self.registry.slot_count();
    }

    // --- Diagnostics ---

    /// Installs or removes the debug sink, handing back the previous one.
    pub fn set_log_sink(&mut self, sink: Option<&'a mut dyn LogSink>) -> Option<&'a mut dyn LogSink> {
        self.log.set_sink(sink)
    }

    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.log.set_level(level);
    }

    #[inline]
    pub fn debug_level(&self) -> DebugLevel {
        self.log.level()
    }

    // --- Collaborator access ---

    #[inline]
    pub fn pulse_in(&self) -> &PI {
        &self.pulse_in
    }

    #[inline]
    pub fn pulse_in_mut(&mut self) -> &mut PI {
        &mut self.pulse_in
    }

    #[inline]
    pub fn trigger(&self) -> &TR {
        &self.trigger
    }

    #[inline]
    pub fn trigger_mut(&mut self) -> &mut TR {
        &mut self.trigger
    }

    /// Consumes the driver and returns the collaborators.
    pub fn release(self) -> (PI, TR) {
        (self.pulse_in, self.trigger)
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Sensor<'a, P>, Hcsr04Error> {
        if name.is_empty() {
            return Err(Hcsr04Error::InvalidName);
        }
        self.registry.get_by_name_mut(name).ok_or(Hcsr04Error::NotFound)
    }
}
