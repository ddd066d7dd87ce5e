// src/common/name.rs

use super::error::Hcsr04Error;
use core::fmt;
use heapless::String;

/// Maximum length of a sensor name in bytes. Longer names are truncated.
pub const NAME_LEN: usize = 15;

/// Unique identity of a registered sensor.
///
/// Names are truncated to [`NAME_LEN`] bytes, cutting at the last character
/// boundary that fits, so two inputs sharing the same leading `NAME_LEN` bytes
/// map to the same `SensorName`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SensorName(String<NAME_LEN>);

impl SensorName {
    /// Creates a name, truncating it if needed. Empty names are rejected.
    pub fn new(name: &str) -> Result<Self, Hcsr04Error> {
        if name.is_empty() {
            return Err(Hcsr04Error::InvalidName);
        }

        let mut inner = String::new();
        for c in name.chars() {
            // Stops at the first char that no longer fits.
            if inner.push(c).is_err() {
                break;
            }
        }
        Ok(SensorName(inner))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for SensorName {
    type Error = Hcsr04Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for SensorName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorName {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
