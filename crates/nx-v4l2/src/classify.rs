// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Name classification
//!
//! Video nodes and media entities are matched to roles by the name the
//! kernel advertises for them. Driver-owned nodes follow a
//! `<prefix><instance>` convention (`nx-clipper1`, `VIDEO MPEGTS2`); sensor
//! nodes carry the sensor driver's own name, which is only known after the
//! sysfs sensor scan.

use crate::entry::Directory;
use crate::role::Role;

/// Split `raw` into its leading non-digit prefix and the number that follows.
///
/// A missing number is instance 0. A number too large to represent yields
/// `usize::MAX` so it fails any cardinality check.
pub fn split_name(raw: &str) -> (&str, usize) {
    let digits_at = raw
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (prefix, rest) = raw.split_at(digits_at);
    let digits_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_len];

    let instance = if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(usize::MAX)
    };
    (prefix, instance)
}

/// Map an advertised name to its `(role, instance)`.
///
/// The prefix is compared against each role's advertised prefix first. When
/// none matches, the whole name is compared against the sensor names already
/// recorded in `directory`. Returns `None` for names that belong to no role
/// or whose instance is out of range.
pub fn classify(raw: &str, directory: &Directory) -> Option<(Role, usize)> {
    let (prefix, instance) = split_name(raw);

    let by_prefix = Role::ALL.iter().copied().find(|role| {
        role.subdev_name()
            .or(role.video_name())
            .map_or(false, |advertised| prefix.starts_with(advertised))
    });

    let (role, instance) = match by_prefix {
        Some(role) => (role, instance),
        None => directory
            .sensor_names()
            .find(|(_, name)| raw.starts_with(*name))
            .map(|(sensor, _)| (Role::Sensor, sensor))?,
    };

    if instance >= role.instances() {
        log::debug!("{:?}: {} instance {} out of range", raw, role, instance);
        return None;
    }

    Some((role, instance))
}
