// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Camera sensor scan
//!
//! Each sensor slot publishes `/sys/devices/platform/camerasensorN/info`. The
//! file holds either `no exist` or `is_mipi:<0|1>,name:<sensor name>`.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::Config;
use crate::entry::{truncate_name, Directory, DEVICE_NAME_MAX};
use crate::role::Role;

/// Upper bound on bytes read from a sensor info file.
pub const SENSOR_INFO_MAX: u64 = 512;

const NO_EXIST: &str = "no exist";
const MIPI_FIELD: &str = "is_mipi:";
const NAME_FIELD: &str = ",name:";

/// Parsed content of a sensor info file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorInfo {
    /// The slot reports `no exist`
    Absent,
    /// A sensor is attached to the slot
    Present { is_mipi: bool, name: String },
    /// The payload matches neither recognised shape
    Malformed,
}

/// Parse a sensor info payload.
///
/// Trailing whitespace and NUL padding are ignored. The name is truncated to
/// [`DEVICE_NAME_MAX`] bytes. Anything other than `no exist` or a complete
/// `is_mipi:<0|1>,name:<name>` record with a non-empty name is
/// [`SensorInfo::Malformed`].
pub fn parse_sensor_info(payload: &str) -> SensorInfo {
    let payload = payload.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if payload == NO_EXIST {
        return SensorInfo::Absent;
    }

    let Some(rest) = payload.strip_prefix(MIPI_FIELD) else {
        return SensorInfo::Malformed;
    };
    let is_mipi = match rest.as_bytes().first() {
        Some(b'0') => false,
        Some(b'1') => true,
        _ => return SensorInfo::Malformed,
    };
    match rest[1..].strip_prefix(NAME_FIELD) {
        Some(name) if !name.is_empty() => SensorInfo::Present {
            is_mipi,
            name: truncate_name(name, DEVICE_NAME_MAX),
        },
        _ => SensorInfo::Malformed,
    }
}

/// Read at most `limit` bytes of a small sysfs attribute.
pub(crate) fn read_bounded(path: &Path, limit: u64) -> io::Result<String> {
    let mut buf = Vec::new();
    File::open(path)?.take(limit).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Probe every sensor slot and record the result in `directory`.
///
/// A slot whose info file is missing, unreadable or malformed is recorded as
/// absent. Returns the number of sensors found.
pub fn scan_sensors(config: &Config, directory: &mut Directory) -> usize {
    let mut found = 0;

    for instance in 0..Role::Sensor.instances() {
        let path = config.sensor_info_path(instance);
        let info = match read_bounded(&path, SENSOR_INFO_MAX) {
            Ok(payload) => parse_sensor_info(&payload),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{}: no sensor slot", path.display());
                SensorInfo::Absent
            }
            Err(err) => {
                log::warn!("failed to read {}: {}", path.display(), err);
                SensorInfo::Absent
            }
        };

        let Ok(entry) = directory.slot_mut(Role::Sensor, instance) else {
            continue;
        };
        match info {
            SensorInfo::Present { is_mipi, name } => {
                log::debug!("sensor {}: {} (mipi: {})", instance, name, is_mipi);
                entry.exists = true;
                entry.is_mipi = is_mipi;
                entry.device_name = name;
                found += 1;
            }
            SensorInfo::Absent => entry.exists = false,
            SensorInfo::Malformed => {
                log::warn!("{}: malformed sensor info, ignoring slot", path.display());
                entry.exists = false;
            }
        }
    }

    found
}
