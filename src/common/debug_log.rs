// src/common/debug_log.rs

use super::hal_traits::LogSink;
use super::timing::LOG_LINE_LEN;
use super::types::DebugLevel;
use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Debug-level gated diagnostics, formatted into a fixed line buffer.
///
/// Lines longer than [`LOG_LINE_LEN`] are cut. Formatting never fails the
/// caller: a diagnostic must not change what the driver does.
pub struct DebugLog<'a> {
    sink: Option<&'a mut dyn LogSink>,
    level: DebugLevel,
}

impl<'a> DebugLog<'a> {
    pub const fn new() -> Self {
        DebugLog {
            sink: None,
            level: DebugLevel::Disabled,
        }
    }

    /// Installs `sink` (or removes it with `None`), returning the previous one.
    pub fn set_sink(&mut self, sink: Option<&'a mut dyn LogSink>) -> Option<&'a mut dyn LogSink> {
        core::mem::replace(&mut self.sink, sink)
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    #[inline]
    pub fn level(&self) -> DebugLevel {
        self.level
    }

    /// True when a line at `level` would reach a sink.
    #[inline]
    pub fn enabled(&self, level: DebugLevel) -> bool {
        level != DebugLevel::Disabled && self.level >= level && self.sink.is_some()
    }

    pub fn info(&mut self, args: fmt::Arguments<'_>) {
        self.emit(DebugLevel::Info, args)
    }

    fn emit(&mut self, level: DebugLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            let mut line = LineBuffer(ArrayString::new());
            // Overflow only truncates the line.
            let _ = line.write_fmt(args);
            sink.write_line(line.0.as_str());
        }
    }
}

impl Default for DebugLog<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps every character that fits instead of dropping the whole fragment.
struct LineBuffer(ArrayString<LOG_LINE_LEN>);

impl Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.try_push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

/// [`LogSink`] forwarding every line to the `log` facade at debug level.
#[cfg(feature = "log")]
#[derive(Debug, Default, Copy, Clone)]
pub struct LogFacade;

#[cfg(feature = "log")]
impl LogSink for LogFacade {
    fn write_line(&mut self, line: &str) {
        ::log::debug!(target: "hcsr04", "{}", line);
    }
}
