// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Device directory
//!
//! The [`Directory`] holds one [`Entry`] per `(role, instance)` slot. It is
//! written once by the discovery stages and read-only afterwards.

use std::fmt;

use crate::role::Role;
use crate::Error;

/// Maximum length in bytes of a recorded device name.
pub const DEVICE_NAME_MAX: usize = 63;

/// One discoverable device or media entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Whether this role/instance is present on the system
    pub exists: bool,
    /// Sensor is attached over MIPI CSI (sensor entries only)
    pub is_mipi: bool,
    /// Media-graph entity id, 0 until an entity matched (kernel ids start at 1)
    pub entity_id: u32,
    /// Number of pads on the media entity
    pub pad_count: u16,
    /// Number of links on the media entity
    pub link_count: u16,
    /// Name advertised by sysfs or the video4linux class
    pub device_name: String,
    /// Device node to open, empty until a video node matched
    pub device_node: String,
}

impl Entry {
    /// Present and openable.
    pub fn has_node(&self) -> bool {
        self.exists && !self.device_node.is_empty()
    }

    /// A media-graph entity has been matched to this entry.
    pub fn has_entity(&self) -> bool {
        self.entity_id != 0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "devname\t:\t{}", self.device_name)?;
        writeln!(f, "devnode\t:\t{}", self.device_node)?;
        writeln!(f, "entity_id\t:\t{}", self.entity_id)?;
        writeln!(f, "pads\t:\t{}", self.pad_count)?;
        write!(f, "links\t:\t{}", self.link_count)
    }
}

/// Table of all entries, addressed by `(role, instance)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<Entry>,
    cached: bool,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Create an empty, uncached directory.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::default(); Role::SLOTS],
            cached: false,
        }
    }

    fn index(role: Role, instance: usize) -> Result<usize, Error> {
        if instance >= role.instances() {
            return Err(Error::InvalidInstance { role, instance });
        }
        Ok(role.base() + instance)
    }

    /// Look up a present entry.
    ///
    /// Returns `Ok(None)` when the slot exists but nothing was discovered for
    /// it, and [`Error::InvalidInstance`] when `instance` is out of range for
    /// `role`.
    pub fn lookup(&self, role: Role, instance: usize) -> Result<Option<&Entry>, Error> {
        let entry = self.slot(role, instance)?;
        Ok(entry.exists.then_some(entry))
    }

    /// Raw slot access, including entries that do not exist.
    pub fn slot(&self, role: Role, instance: usize) -> Result<&Entry, Error> {
        Ok(&self.entries[Self::index(role, instance)?])
    }

    pub(crate) fn slot_mut(&mut self, role: Role, instance: usize) -> Result<&mut Entry, Error> {
        let index = Self::index(role, instance)?;
        Ok(&mut self.entries[index])
    }

    /// Whether the video-node walk has completed.
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub(crate) fn mark_cached(&mut self) {
        self.cached = true;
    }

    /// Whether sensor `instance` was reported as a MIPI camera.
    ///
    /// False for absent or out-of-range sensors.
    pub fn is_mipi_camera(&self, instance: usize) -> bool {
        matches!(self.lookup(Role::Sensor, instance), Ok(Some(e)) if e.is_mipi)
    }

    /// Iterate over every slot in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, usize, &Entry)> + '_ {
        Role::ALL
            .iter()
            .flat_map(|role| (0..role.instances()).map(move |i| (*role, i)))
            .zip(self.entries.iter())
            .map(|((role, instance), entry)| (role, instance, entry))
    }

    /// Iterate over present entries only.
    pub fn present(&self) -> impl Iterator<Item = (Role, usize, &Entry)> + '_ {
        self.iter().filter(|(_, _, entry)| entry.exists)
    }

    /// Names recorded by the sensor scan, as `(instance, name)`.
    pub(crate) fn sensor_names(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.iter()
            .filter(|(role, _, entry)| *role == Role::Sensor && entry.exists)
            .map(|(_, instance, entry)| (instance, entry.device_name.as_str()))
            .filter(|(_, name)| !name.is_empty())
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.cached {
            return write!(f, "not cached");
        }
        for (role, instance, entry) in self.present() {
            writeln!(f)?;
            writeln!(f, "[{} {}]", role, instance)?;
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Truncate `name` to at most `max` bytes on a character boundary.
pub(crate) fn truncate_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_directory_is_empty() {
        let dir = Directory::new();
        assert!(!dir.is_cached());
        for role in Role::ALL {
            for instance in 0..role.instances() {
                assert_eq!(dir.lookup(role, instance).unwrap(), None);
            }
        }
        assert_eq!(dir.present().count(), 0);
        assert_eq!(dir, Directory::new());
    }

    #[test]
    fn test_out_of_range_instance_is_rejected() {
        let dir = Directory::new();
        assert!(matches!(
            dir.lookup(Role::Csi, 1),
            Err(Error::InvalidInstance {
                role: Role::Csi,
                instance: 1
            })
        ));
        assert!(dir.slot(Role::Sensor, 3).is_err());
        assert!(dir.lookup(Role::MpegtsVideo, 2).is_ok());
    }

    #[test]
    fn test_slots_are_independent() {
        let mut dir = Directory::new();
        {
            let entry = dir.slot_mut(Role::Decimator, 2).unwrap();
            entry.exists = true;
            entry.device_node = "/dev/v4l-subdev5".to_string();
        }
        assert!(dir.lookup(Role::Decimator, 2).unwrap().unwrap().has_node());
        assert_eq!(dir.lookup(Role::Decimator, 1).unwrap(), None);
        assert_eq!(dir.lookup(Role::Csi, 0).unwrap(), None);
        assert_eq!(dir.lookup(Role::ClipperVideo, 0).unwrap(), None);

        let present: Vec<(Role, usize)> = dir.present().map(|(r, i, _)| (r, i)).collect();
        assert_eq!(present, vec![(Role::Decimator, 2)]);
    }

    #[test]
    fn test_has_entity_ignores_pad_count() {
        let mut entry = Entry {
            exists: true,
            ..Default::default()
        };
        assert!(!entry.has_entity());
        entry.entity_id = 7;
        assert!(entry.has_entity());
        assert_eq!(entry.pad_count, 0);
    }

    #[test]
    fn test_is_mipi_camera() {
        let mut dir = Directory::new();
        {
            let entry = dir.slot_mut(Role::Sensor, 1).unwrap();
            entry.exists = true;
            entry.is_mipi = true;
        }
        {
            // Stale flag on an absent slot is not reported
            let entry = dir.slot_mut(Role::Sensor, 2).unwrap();
            entry.is_mipi = true;
        }
        assert!(!dir.is_mipi_camera(0));
        assert!(dir.is_mipi_camera(1));
        assert!(!dir.is_mipi_camera(2));
        assert!(!dir.is_mipi_camera(7));
    }

    #[test]
    fn test_sensor_names_skip_empty() {
        let mut dir = Directory::new();
        dir.slot_mut(Role::Sensor, 0).unwrap().exists = true;
        {
            let entry = dir.slot_mut(Role::Sensor, 2).unwrap();
            entry.exists = true;
            entry.device_name = "sp2518".to_string();
        }
        let names: Vec<(usize, &str)> = dir.sensor_names().collect();
        assert_eq!(names, vec![(2, "sp2518")]);
    }

    #[test]
    fn test_display_uncached() {
        assert_eq!(format!("{}", Directory::new()), "not cached");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", DEVICE_NAME_MAX), "short");
        let long = "x".repeat(100);
        assert_eq!(truncate_name(&long, DEVICE_NAME_MAX).len(), DEVICE_NAME_MAX);
        // 'é' is two bytes; never split it
        assert_eq!(truncate_name("aé", 2), "a");
    }
}
