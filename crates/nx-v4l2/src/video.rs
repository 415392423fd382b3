// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Video node walk
//!
//! Every node registered with the video4linux class, subdevices included,
//! has a directory under `/sys/class/video4linux` with a `name` attribute.
//! Nodes whose name classifies to a role are recorded with their `/dev`
//! path.

use std::fs;

use crate::classify::classify;
use crate::config::Config;
use crate::entry::{truncate_name, Directory, DEVICE_NAME_MAX};
use crate::sysfs::read_bounded;

/// Upper bound on bytes read from a node's `name` attribute.
pub const NODE_NAME_MAX: u64 = DEVICE_NAME_MAX as u64;

/// Sorted node names found in the class directory.
fn list_nodes(config: &Config) -> Vec<String> {
    let entries = match fs::read_dir(config.class_dir()) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("can't list {}: {}", config.class_dir().display(), err);
            return Vec::new();
        }
    };

    let mut nodes: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    nodes.sort();
    nodes
}

/// Walk the video4linux class and record matching nodes in `directory`.
///
/// Must run after [`scan_sensors`](crate::sysfs::scan_sensors) so that
/// sensor nodes can be matched by name. Unreadable, unclassifiable and
/// duplicate nodes are skipped. The directory is marked cached once the
/// walk finishes, whatever was found. Returns the number of nodes recorded.
pub fn enumerate_video_nodes(config: &Config, directory: &mut Directory) -> usize {
    let mut recorded = 0;

    for node in list_nodes(config) {
        let name_path = config.class_dir().join(&node).join("name");
        let name = match read_bounded(&name_path, NODE_NAME_MAX) {
            Ok(raw) => raw
                .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string(),
            Err(err) => {
                log::warn!("can't read {}: {}", name_path.display(), err);
                continue;
            }
        };
        if name.is_empty() {
            log::warn!("can't read {}: empty name", name_path.display());
            continue;
        }

        let Some((role, instance)) = classify(&name, directory) else {
            log::debug!("{}: {:?} has no role", node, name);
            continue;
        };

        let device_node = config.device_node(&node);
        let Ok(entry) = directory.slot_mut(role, instance) else {
            continue;
        };
        if !entry.device_node.is_empty() {
            log::debug!(
                "{}: {} {} already at {}",
                node,
                role,
                instance,
                entry.device_node
            );
            continue;
        }

        entry.exists = true;
        entry.device_node = device_node.to_string_lossy().into_owned();
        if entry.device_name.is_empty() {
            entry.device_name = truncate_name(&name, DEVICE_NAME_MAX);
        }
        log::debug!("{} {} -> {} ({})", role, instance, entry.device_node, name);
        recorded += 1;
    }

    directory.mark_cached();
    recorded
}
