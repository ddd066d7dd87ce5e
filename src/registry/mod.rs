// src/registry/mod.rs

//! Fixed-capacity sensor storage.
//!
//! Sensors live in an arena of `N` slots. Freed slots go to a free list and
//! have their generation bumped, so a [`SensorHandle`] to a deleted sensor
//! never resolves to whatever reuses the slot. Iteration and the scheduler's
//! round robin follow slot order.

use crate::common::{error::Hcsr04Error, name::SensorName, types::PinWiring};
use crate::sensor::Sensor;
use heapless::Vec;

/// Default number of sensors a driver can hold.
pub const DEFAULT_MAX_SENSORS: usize = 4;

/// Stable reference to a registered sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorHandle {
    index: usize,
    generation: u32,
}

impl SensorHandle {
    /// Arena slot this handle points at.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
enum Slot<'a, P> {
    Occupied { generation: u32, sensor: Sensor<'a, P> },
    Vacant { generation: u32 },
}

impl<'a, P> Slot<'a, P> {
    fn sensor(&self) -> Option<&Sensor<'a, P>> {
        match self {
            Slot::Occupied { sensor, .. } => Some(sensor),
            Slot::Vacant { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct SensorRegistry<'a, P, const N: usize = DEFAULT_MAX_SENSORS> {
    slots: Vec<Slot<'a, P>, N>,
    free: Vec<usize, N>,
    len: usize,
}

impl<'a, P, const N: usize> SensorRegistry<'a, P, N> {
    pub const fn new() -> Self {
        SensorRegistry {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registers a new, disabled sensor.
    ///
    /// The name is truncated before the uniqueness check.
    pub fn create(
        &mut self,
        name: &str,
        trigger: PinWiring<P>,
        echo: PinWiring<P>,
    ) -> Result<SensorHandle, Hcsr04Error> {
        let name = SensorName::new(name)?;
        if self.len >= N {
            return Err(Hcsr04Error::CapacityExhausted { capacity: N });
        }
        if self.find_exact(&name).is_some() {
            return Err(Hcsr04Error::DuplicateName);
        }

        let sensor = Sensor::new(name, trigger, echo);

        let handle = if let Some(index) = self.free.pop() {
            let slot = self.slots.get_mut(index).ok_or(Hcsr04Error::CapacityExhausted { capacity: N })?;
            let generation = match &*slot {
                Slot::Vacant { generation } => *generation,
                // Free list only ever holds vacant slots.
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
            };
            *slot = Slot::Occupied { generation, sensor };
            SensorHandle { index, generation }
        } else {
            let index = self.slots.len();
            self.slots
                .push(Slot::Occupied { generation: 0, sensor })
                .map_err(|_| Hcsr04Error::CapacityExhausted { capacity: N })?;
            SensorHandle { index, generation: 0 }
        };

        self.len += 1;
        Ok(handle)
    }

    /// Removes the sensor called `name`, returning it.
    ///
    /// `Ok(None)` when nothing is registered under that name.
    pub fn delete(&mut self, name: &str) -> Result<Option<Sensor<'a, P>>, Hcsr04Error> {
        let name = SensorName::new(name)?;
        let Some(handle) = self.find_exact(&name) else {
            return Ok(None);
        };
        Ok(self.remove(handle))
    }

    /// Removes the sensor behind `handle`. Stale handles remove nothing.
    pub fn remove(&mut self, handle: SensorHandle) -> Option<Sensor<'a, P>> {
        let slot = self.slots.get_mut(handle.index)?;
        match &*slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation => {}
            _ => return None,
        }

        let vacant = Slot::Vacant { generation: handle.generation.wrapping_add(1) };
        let Slot::Occupied { sensor, .. } = core::mem::replace(slot, vacant) else {
            return None;
        };
        // Cannot overflow: at most N slots exist and this one was occupied.
        let _ = self.free.push(handle.index);
        self.len -= 1;
        Some(sensor)
    }

    /// Looks a sensor up by name (truncated the same way as on creation).
    pub fn find(&self, name: &str) -> Option<SensorHandle> {
        let name = SensorName::new(name).ok()?;
        self.find_exact(&name)
    }

    fn find_exact(&self, name: &SensorName) -> Option<SensorHandle> {
        self.slots.iter().enumerate().find_map(|(index, slot)| match slot {
            Slot::Occupied { generation, sensor } if sensor.name() == name => Some(SensorHandle {
                index,
                generation: *generation,
            }),
            _ => None,
        })
    }

    pub fn get(&self, handle: SensorHandle) -> Option<&Sensor<'a, P>> {
        match self.slots.get(handle.index)? {
            Slot::Occupied { generation, sensor } if *generation == handle.generation => Some(sensor),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: SensorHandle) -> Option<&mut Sensor<'a, P>> {
        match self.slots.get_mut(handle.index)? {
            Slot::Occupied { generation, sensor } if *generation == handle.generation => Some(sensor),
            _ => None,
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Sensor<'a, P>> {
        self.find(name).and_then(|handle| self.get(handle))
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Sensor<'a, P>> {
        let handle = self.find(name)?;
        self.get_mut(handle)
    }

    /// Live sensors in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorHandle, &Sensor<'a, P>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied { generation, sensor } => Some((
                SensorHandle {
                    index,
                    generation: *generation,
                },
                sensor,
            )),
            Slot::Vacant { .. } => None,
        })
    }

    /// First occupied slot at or after `start`, wrapping around once.
    pub(crate) fn next_occupied(&self, start: usize) -> Option<usize> {
        let count = self.slots.len();
        if count == 0 {
            return None;
        }
        (0..count)
            .map(|offset| (start + offset) % count)
            .find(|&index| self.slots.get(index).and_then(Slot::sensor).is_some())
    }

    /// Number of arena slots handed out so far (occupied or vacant).
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn sensor_at_mut(&mut self, index: usize) -> Option<&mut Sensor<'a, P>> {
        match self.slots.get_mut(index)? {
            Slot::Occupied { sensor, .. } => Some(sensor),
            Slot::Vacant { .. } => None,
        }
    }
}

impl<P, const N: usize> Default for SensorRegistry<'_, P, N> {
    fn default() -> Self {
        Self::new()
    }
}
