// src/sensor/engine.rs

use super::distance::{echo_timeout_bound, echo_to_distance_cm, speed_of_sound_scaled, validate_distance};
use super::Sensor;
use crate::common::{
    debug_log::DebugLog,
    hal_traits::{PulseIn, TriggerPort},
    timing::TRIGGER_PULSE_US,
    types::{MeasureMode, PinLevel, NO_READING},
};

impl<'a, P> Sensor<'a, P> {
    /// Runs one measurement cycle and returns the distance in cm, or
    /// [`NO_READING`].
    ///
    /// An idle sensor is skipped without touching the collaborators. After
    /// the cycle a oneshot sensor (or one never armed) returns to idle.
    pub(crate) fn run_cycle<PI, TR>(
        &mut self,
        pulse_in: &mut PI,
        trigger: &mut TR,
        log: &mut DebugLog<'_>,
    ) -> f32
    where
        PI: PulseIn<P>,
        TR: TriggerPort<P>,
    {
        if !self.state.enabled {
            return NO_READING;
        }

        log.info(format_args!("Sensor \"{}\": measurement started", self.name));

        let sos = speed_of_sound_scaled(self.state.temperature_c);

        // No usable speed of sound (NaN or absurdly cold): there is no finite
        // echo bound, so the hardware is left alone.
        let distance = if sos == 0 {
            NO_READING
        } else {
            let timeout = echo_timeout_bound(sos, self.state.max_distance_cm);
            trigger.trigger(&self.trigger, PinLevel::High, TRIGGER_PULSE_US, self.state.context);
            let echo_us = pulse_in.pulse_in(&self.echo, PinLevel::High, timeout, self.state.context);
            validate_distance(echo_to_distance_cm(sos, echo_us), self.state.max_distance_cm)
        };

        log.info(format_args!("Sensor \"{}\": measured distance {:.2}", self.name, distance));

        if let Some(listener) = self.state.listener {
            listener.distance_ready(distance, self.state.context);
        }

        if self.state.mode.unwrap_or_default() == MeasureMode::Oneshot {
            self.state.enabled = false;
        }

        distance
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{
        hal_traits::{DistanceListener, LogSink},
        name::SensorName,
        types::{DebugLevel, PinWiring, SensorContext},
    };
    use core::cell::Cell;

    // --- Mock collaborators ---
    #[derive(Default)]
    struct MockPulseIn {
        echo_us: u64,
        calls: u32,
        last_pin: Option<PinWiring<u8>>,
        last_level: Option<PinLevel>,
        last_bound: u64,
    }

    impl PulseIn<u8> for MockPulseIn {
        fn pulse_in(&mut self, echo: &PinWiring<u8>, level: PinLevel, max_duration_us: u64, _context: SensorContext<'_>) -> u64 {
            self.calls += 1;
            self.last_pin = Some(*echo);
            self.last_level = Some(level);
            self.last_bound = max_duration_us;
            self.echo_us
        }
    }

    #[derive(Default)]
    struct MockTrigger {
        calls: u32,
        last_pin: Option<PinWiring<u8>>,
        last_duration: u64,
    }

    impl TriggerPort<u8> for MockTrigger {
        fn trigger(&mut self, trigger: &PinWiring<u8>, level: PinLevel, duration_us: u64, _context: SensorContext<'_>) {
            assert_eq!(level, PinLevel::High);
            self.calls += 1;
            self.last_pin = Some(*trigger);
            self.last_duration = duration_us;
        }
    }

    struct MockListener {
        calls: Cell<u32>,
        last: Cell<f32>,
        last_ctx: Cell<Option<u32>>,
    }

    impl MockListener {
        fn new() -> Self {
            MockListener { calls: Cell::new(0), last: Cell::new(0.0), last_ctx: Cell::new(None) }
        }
    }

    impl DistanceListener for MockListener {
        fn distance_ready(&self, distance_cm: f32, context: SensorContext<'_>) {
            self.calls.set(self.calls.get() + 1);
            self.last.set(distance_cm);
            self.last_ctx.set(context.downcast_ref::<u32>().copied());
        }
    }

    struct CountingSink {
        lines: u32,
    }

    impl LogSink for CountingSink {
        fn write_line(&mut self, _line: &str) {
            self.lines += 1;
        }
    }

    fn sensor<'a>() -> Sensor<'a, u8> {
        Sensor::new(SensorName::new("front").unwrap(), PinWiring::new(0, 2), PinWiring::new(0, 3))
    }

    #[test]
    fn test_idle_cycle_is_noop() {
        let mut s = sensor();
        let mut pulse = MockPulseIn { echo_us: 1000, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
        assert_eq!(pulse.calls, 0);
        assert_eq!(trig.calls, 0);
    }

    #[test]
    fn test_oneshot_cycle() {
        let listener = MockListener::new();
        let ctx_value: u32 = 7;
        let mut s = sensor();
        s.arm(MeasureMode::Oneshot, 20.0, 400, Some(&listener), SensorContext::new(&ctx_value));

        let mut pulse = MockPulseIn { echo_us: 5824, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        let d = s.run_cycle(&mut pulse, &mut trig, &mut log);
        assert!((d - 100.0).abs() < 0.5);

        assert_eq!(trig.calls, 1);
        assert_eq!(trig.last_pin, Some(PinWiring::new(0, 2)));
        assert_eq!(trig.last_duration, TRIGGER_PULSE_US);

        assert_eq!(pulse.calls, 1);
        assert_eq!(pulse.last_pin, Some(PinWiring::new(0, 3)));
        assert_eq!(pulse.last_level, Some(PinLevel::High));
        assert_eq!(pulse.last_bound, 72 * 400 * 1000);

        assert_eq!(listener.calls.get(), 1);
        assert_eq!(listener.last.get(), d);
        assert_eq!(listener.last_ctx.get(), Some(7));

        assert!(!s.is_enabled());
        // A second cycle does nothing.
        assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
        assert_eq!(pulse.calls, 1);
    }

    #[test]
    fn test_continuous_stays_armed() {
        let mut s = sensor();
        s.arm(MeasureMode::Continuous, 20.0, 400, None, SensorContext::NONE);
        let mut pulse = MockPulseIn { echo_us: 1000, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        for _ in 0..5 {
            s.run_cycle(&mut pulse, &mut trig, &mut log);
            assert!(s.is_enabled());
        }
        assert_eq!(pulse.calls, 5);
    }

    #[test]
    fn test_timeout_reports_no_reading() {
        let listener = MockListener::new();
        let mut s = sensor();
        s.arm(MeasureMode::Oneshot, 20.0, 400, Some(&listener), SensorContext::NONE);
        let mut pulse = MockPulseIn { echo_us: 0, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
        assert_eq!(listener.last.get(), NO_READING);
        assert_eq!(listener.calls.get(), 1);
    }

    #[test]
    fn test_beyond_max_distance_reports_no_reading() {
        let mut s = sensor();
        s.arm(MeasureMode::Oneshot, 20.0, 50, None, SensorContext::NONE);
        // ~100 cm, above the 50 cm ceiling
        let mut pulse = MockPulseIn { echo_us: 5824, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
    }

    #[test]
    fn test_unusable_temperature_skips_hardware() {
        for temperature in [f32::NAN, f32::NEG_INFINITY, -1000.0] {
            let listener = MockListener::new();
            let mut s = sensor();
            s.arm(MeasureMode::Oneshot, temperature, u16::MAX, Some(&listener), SensorContext::NONE);
            let mut pulse = MockPulseIn { echo_us: 5824, ..Default::default() };
            let mut trig = MockTrigger::default();
            let mut log = DebugLog::new();

            assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
            assert_eq!(pulse.calls, 0);
            assert_eq!(trig.calls, 0);
            // The cycle still completes for the listener and the mode.
            assert_eq!(listener.calls.get(), 1);
            assert_eq!(listener.last.get(), NO_READING);
            assert!(!s.is_enabled());
        }
    }

    #[test]
    fn test_hot_temperature_passes_finite_bound() {
        let mut s = sensor();
        s.arm(MeasureMode::Oneshot, f32::INFINITY, u16::MAX, None, SensorContext::NONE);
        let mut pulse = MockPulseIn { echo_us: 0, ..Default::default() };
        let mut trig = MockTrigger::default();
        let mut log = DebugLog::new();

        assert_eq!(s.run_cycle(&mut pulse, &mut trig, &mut log), NO_READING);
        assert_eq!(pulse.calls, 1);
        assert!(pulse.last_bound < u64::MAX);
    }

    #[test]
    fn test_cycle_logs_start_and_result() {
        let mut sink = CountingSink { lines: 0 };
        {
            let mut log = DebugLog::new();
            log.set_sink(Some(&mut sink));
            log.set_level(DebugLevel::Info);

            let mut s = sensor();
            s.arm(MeasureMode::Oneshot, 20.0, 400, None, SensorContext::NONE);
            let mut pulse = MockPulseIn { echo_us: 1000, ..Default::default() };
            let mut trig = MockTrigger::default();
            s.run_cycle(&mut pulse, &mut trig, &mut log);
            // Idle cycle logs nothing.
            s.run_cycle(&mut pulse, &mut trig, &mut log);
        }
        assert_eq!(sink.lines, 2);
    }
}
