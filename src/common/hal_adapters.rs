// src/common/hal_adapters.rs

//! embedded-hal 1.0 implementations of the pulse and trigger collaborators.
//!
//! Each adapter owns `M` pins and selects one by [`PinWiring::pin`]; the port
//! handle is unused (`()`). Timing is software polling in 1 µs steps, so
//! accuracy depends on how fast the pin can be read.

use super::hal_traits::{PulseIn, TriggerPort};
use super::types::{PinLevel, PinWiring, SensorContext};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Polls echo pins to time the returning pulse.
pub struct HalPulseIn<I, D, const M: usize> {
    pins: [I; M],
    delay: D,
}

impl<I, D, const M: usize> HalPulseIn<I, D, M>
where
    I: InputPin,
    D: DelayNs,
{
    pub fn new(pins: [I; M], delay: D) -> Self {
        HalPulseIn { pins, delay }
    }

    pub fn release(self) -> ([I; M], D) {
        (self.pins, self.delay)
    }

    /// `None` if the pin could not be read.
    fn at_level(pin: &mut I, level: PinLevel) -> Option<bool> {
        match level {
            PinLevel::High => pin.is_high().ok(),
            PinLevel::Low => pin.is_low().ok(),
        }
    }
}

impl<I, D, const M: usize> PulseIn<()> for HalPulseIn<I, D, M>
where
    I: InputPin,
    D: DelayNs,
{
    fn pulse_in(
        &mut self,
        echo: &PinWiring<()>,
        level: PinLevel,
        max_duration_us: u64,
        _context: SensorContext<'_>,
    ) -> u64 {
        let Some(pin) = self.pins.get_mut(usize::from(echo.pin)) else {
            return 0;
        };

        // Wait for the pulse to start.
        let mut elapsed: u64 = 0;
        loop {
            match Self::at_level(pin, level) {
                Some(true) => break,
                Some(false) => {}
                None => return 0,
            }
            if elapsed >= max_duration_us {
                return 0;
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }

        // Time it until it ends; the whole wait shares one bound.
        let mut width: u64 = 0;
        loop {
            match Self::at_level(pin, level) {
                Some(true) => {}
                Some(false) => return width,
                None => return 0,
            }
            if elapsed >= max_duration_us {
                return 0;
            }
            self.delay.delay_us(1);
            elapsed += 1;
            width += 1;
        }
    }
}

/// Drives trigger pins for a fixed duration.
pub struct HalTrigger<O, D, const M: usize> {
    pins: [O; M],
    delay: D,
}

impl<O, D, const M: usize> HalTrigger<O, D, M>
where
    O: OutputPin,
    D: DelayNs,
{
    pub fn new(pins: [O; M], delay: D) -> Self {
        HalTrigger { pins, delay }
    }

    pub fn release(self) -> ([O; M], D) {
        (self.pins, self.delay)
    }
}

impl<O, D, const M: usize> TriggerPort<()> for HalTrigger<O, D, M>
where
    O: OutputPin,
    D: DelayNs,
{
    fn trigger(
        &mut self,
        trigger: &PinWiring<()>,
        level: PinLevel,
        duration_us: u64,
        _context: SensorContext<'_>,
    ) {
        let Some(pin) = self.pins.get_mut(usize::from(trigger.pin)) else {
            return;
        };
        let (active, rest) = match level {
            PinLevel::High => (PinState::High, PinState::Low),
            PinLevel::Low => (PinState::Low, PinState::High),
        };

        if pin.set_state(active).is_err() {
            return;
        }
        self.delay.delay_us(u32::try_from(duration_us).unwrap_or(u32::MAX));
        let _ = pin.set_state(rest);
    }
}
