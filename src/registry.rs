//! Bounded per-role device registry.
//!
//! Arena storage: a dense slot vector plus a free list, so a [`DeviceId`]
//! stays valid for as long as its device is registered and slots are reused
//! without reallocation churn. Each role is capped (default 10); insertion
//! beyond the cap is an error, never growth, which keeps a runaway
//! enumeration from eating descriptors.
//!
//! The registry owns every [`Device`]; a device's lifetime ends only via
//! [`unregister`](Registry::unregister), which hands the device back so the
//! caller can close its handle.

use crate::classify::Role;
use crate::device::Device;
use crate::error::InputError;
use std::path::Path;

/// Stable handle to a registered device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(usize);

/// A rejected registration. The device rides along so the caller can close
/// its handle — losing it here would leak the descriptor.
#[derive(Debug)]
pub struct RegisterError {
    pub device: Device,
    pub reason: InputError,
}

pub struct Registry {
    slots: Vec<Option<Device>>,
    free: Vec<usize>,
    capacity_per_role: usize,
}

impl Registry {
    pub fn new(capacity_per_role: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity_per_role,
        }
    }

    pub fn capacity_per_role(&self) -> usize {
        self.capacity_per_role
    }

    /// Insert a device, enforcing the per-role cap and path uniqueness.
    pub fn register(&mut self, device: Device) -> Result<DeviceId, RegisterError> {
        if self.contains_path(device.path()) {
            let reason = InputError::AlreadyRegistered(device.path().to_owned());
            return Err(RegisterError { device, reason });
        }
        if self.role_len(device.role()) >= self.capacity_per_role {
            let reason = InputError::CapacityExceeded {
                role: device.role(),
                capacity: self.capacity_per_role,
            };
            return Err(RegisterError { device, reason });
        }

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(device);
                DeviceId(index)
            }
            None => {
                self.slots.push(Some(device));
                DeviceId(self.slots.len() - 1)
            }
        };
        Ok(id)
    }

    /// Remove a device, returning it so the caller can close the handle.
    pub fn unregister(&mut self, id: DeviceId) -> Option<Device> {
        let device = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(device)
    }

    /// Remove every device, for teardown.
    pub fn drain_all(&mut self) -> Vec<Device> {
        let drained: Vec<Device> = self.slots.iter_mut().filter_map(Option::take).collect();
        self.free.clear();
        self.slots.clear();
        drained
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.iter().any(|(_, dev)| dev.path() == path)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn role_len(&self, role: Role) -> usize {
        self.iter_role(role).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|dev| (DeviceId(index), dev)))
    }

    pub fn iter_role(&self, role: Role) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.iter().filter(move |(_, dev)| dev.role() == role)
    }

    /// Snapshot of current ids, for iteration that unregisters as it goes.
    pub fn ids(&self) -> Vec<DeviceId> {
        self.iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::RawHandle;
    use crate::caps::Capabilities;
    use crate::metadata::DeviceMeta;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn device(n: i32, role: Role) -> Device {
        Device::new(
            RawHandle(n),
            PathBuf::from(format!("/dev/input/event{n}")),
            role,
            Capabilities::default(),
            HashMap::new(),
            DeviceMeta::default(),
        )
    }

    #[test]
    fn capacity_is_enforced_per_role() {
        let mut reg = Registry::new(10);
        for n in 0..10 {
            reg.register(device(n, Role::Joystick)).unwrap();
        }
        // A different role still has room.
        reg.register(device(100, Role::Keyboard)).unwrap();

        let err = reg.register(device(10, Role::Joystick)).unwrap_err();
        assert!(matches!(
            err.reason,
            InputError::CapacityExceeded {
                role: Role::Joystick,
                capacity: 10
            }
        ));
        // The rejected device is handed back intact.
        assert_eq!(err.device.handle(), RawHandle(10));
        assert_eq!(reg.role_len(Role::Joystick), 10);
    }

    #[test]
    fn duplicate_path_is_rejected_without_growth() {
        let mut reg = Registry::new(10);
        reg.register(device(1, Role::Pointer)).unwrap();
        let err = reg.register(device(1, Role::Pointer)).unwrap_err();
        assert!(matches!(err.reason, InputError::AlreadyRegistered(_)));
        assert_eq!(reg.role_len(Role::Pointer), 1);
    }

    #[test]
    fn unregister_frees_the_slot_and_the_path() {
        let mut reg = Registry::new(10);
        let id = reg.register(device(2, Role::Keyboard)).unwrap();
        let removed = reg.unregister(id).unwrap();
        assert_eq!(removed.handle(), RawHandle(2));
        assert!(reg.get(id).is_none());
        assert!(reg.unregister(id).is_none());

        // Slot is reused and the path can come back.
        let id2 = reg.register(device(2, Role::Keyboard)).unwrap();
        assert_eq!(id, id2);
    }

    #[test]
    fn iter_role_only_yields_that_role() {
        let mut reg = Registry::new(10);
        reg.register(device(1, Role::Joystick)).unwrap();
        reg.register(device(2, Role::Pointer)).unwrap();
        reg.register(device(3, Role::Joystick)).unwrap();
        let joysticks: Vec<_> = reg.iter_role(Role::Joystick).collect();
        assert_eq!(joysticks.len(), 2);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn drain_all_empties_the_registry() {
        let mut reg = Registry::new(10);
        reg.register(device(1, Role::Joystick)).unwrap();
        reg.register(device(2, Role::Pointer)).unwrap();
        let drained = reg.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(reg.is_empty());
    }
}
