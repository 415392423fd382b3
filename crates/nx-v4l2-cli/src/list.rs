// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Directory listing with optional role filtering.

use crate::error::{print_json, CliError};
use clap::Args as ClapArgs;
use nx_v4l2::discovery::Discovery;
use nx_v4l2::entry::{Directory, Entry};
use nx_v4l2::role::{Category, Role};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Show only this role (sensor, clipper, decimator, csi, clipper-video,
    /// decimator-video, mpegts-video)
    #[arg(long)]
    role: Option<Role>,

    /// Include absent slots
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    devices: Vec<DeviceInfo>,
    summary: Summary,
}

#[derive(Debug, Serialize)]
struct DeviceInfo {
    role: String,
    instance: usize,
    category: String,
    exists: bool,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mipi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<MediaEntity>,
}

#[derive(Debug, Serialize)]
struct MediaEntity {
    id: u32,
    pads: u16,
    links: u16,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Summary {
    present: usize,
    sensors: usize,
    mipi_sensors: usize,
    subdevs: usize,
    video_nodes: usize,
    entities: usize,
}

pub fn execute(discovery: &Discovery, args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing list command: {:?}", args);

    let output = collect(discovery.directory(), args.role, args.all);

    if json {
        print_json(&output)?;
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn collect(directory: &Directory, role: Option<Role>, all: bool) -> ListOutput {
    let devices = directory
        .iter()
        .filter(|(r, _, entry)| role.map_or(true, |want| want == *r) && (all || entry.exists))
        .map(|(role, instance, entry)| device_info(role, instance, entry))
        .collect();

    ListOutput {
        devices,
        summary: summarize(directory),
    }
}

fn device_info(role: Role, instance: usize, entry: &Entry) -> DeviceInfo {
    DeviceInfo {
        role: role.to_string(),
        instance,
        category: role.category().to_string(),
        exists: entry.exists,
        name: entry.device_name.clone(),
        node: entry.has_node().then(|| entry.device_node.clone()),
        mipi: (role == Role::Sensor && entry.exists).then_some(entry.is_mipi),
        entity: entry.has_entity().then_some(MediaEntity {
            id: entry.entity_id,
            pads: entry.pad_count,
            links: entry.link_count,
        }),
    }
}

fn summarize(directory: &Directory) -> Summary {
    let mut summary = Summary {
        present: 0,
        sensors: 0,
        mipi_sensors: 0,
        subdevs: 0,
        video_nodes: 0,
        entities: 0,
    };

    for (role, _, entry) in directory.present() {
        summary.present += 1;
        if role == Role::Sensor {
            summary.sensors += 1;
            if entry.is_mipi {
                summary.mipi_sensors += 1;
            }
        }
        if entry.has_node() {
            match role.category() {
                Category::Subdev => summary.subdevs += 1,
                Category::Video => summary.video_nodes += 1,
            }
        }
        if entry.has_entity() {
            summary.entities += 1;
        }
    }

    summary
}

fn print_text_output(output: &ListOutput) {
    println!(
        "Nexell pipeline ({} devices, {} sensors, {} media entities)\n",
        output.summary.present, output.summary.sensors, output.summary.entities
    );

    if output.devices.is_empty() {
        println!("No devices found");
        return;
    }

    for device in &output.devices {
        print_device(device);
    }
}

fn print_device(device: &DeviceInfo) {
    let node = device.node.as_deref().unwrap_or("-");
    if device.exists {
        println!("  {} {}: {} ({})", device.role, device.instance, node, device.name);
    } else {
        println!("  {} {}: absent", device.role, device.instance);
        return;
    }

    if let Some(mipi) = device.mipi {
        println!("    MIPI: {}", if mipi { "yes" } else { "no" });
    }

    if let Some(ref entity) = device.entity {
        println!(
            "    Entity: {} ({} pads, {} links)",
            entity.id, entity.pads, entity.links
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_v4l2::config::Config;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, Directory) {
        let root = tempfile::tempdir().unwrap();
        let sensor = root.path().join("platform/camerasensor0");
        fs::create_dir_all(&sensor).unwrap();
        fs::write(sensor.join("info"), "is_mipi:1,name:sensorX").unwrap();
        for (node, name) in [
            ("v4l-subdev0", "sensorX 0-0030"),
            ("v4l-subdev1", "nx-clipper0"),
            ("video3", "VIDEO CLIPPER0"),
        ] {
            let dir = root.path().join("class").join(node);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("name"), name).unwrap();
        }

        let config = Config::default()
            .with_platform_dir(root.path().join("platform"))
            .with_class_dir(root.path().join("class"))
            .with_media_device(root.path().join("media0"));
        let directory = Discovery::new(config).directory().clone();
        (root, directory)
    }

    #[test]
    fn test_collect_present() {
        let (_root, directory) = fixture();
        let output = collect(&directory, None, false);

        let listed: Vec<(&str, usize)> = output
            .devices
            .iter()
            .map(|d| (d.role.as_str(), d.instance))
            .collect();
        assert_eq!(
            listed,
            vec![("sensor", 0), ("clipper", 0), ("clipper-video", 0)]
        );
        assert_eq!(output.devices[0].mipi, Some(true));
        assert_eq!(output.devices[2].node.as_deref(), Some("/dev/video3"));
        assert!(output.devices[2].entity.is_none());
    }

    #[test]
    fn test_collect_role_filter_with_absent() {
        let (_root, directory) = fixture();
        let output = collect(&directory, Some(Role::Clipper), true);

        assert_eq!(output.devices.len(), 3);
        assert!(output.devices[0].exists);
        assert!(!output.devices[1].exists);
        assert!(output.devices[1].node.is_none());
    }

    #[test]
    fn test_summary() {
        let (_root, directory) = fixture();
        assert_eq!(
            summarize(&directory),
            Summary {
                present: 3,
                sensors: 1,
                mipi_sensors: 1,
                subdevs: 2,
                video_nodes: 1,
                entities: 0,
            }
        );
    }

    #[test]
    fn test_json_shape() {
        let (_root, directory) = fixture();
        let value = serde_json::to_value(collect(&directory, Some(Role::Sensor), false)).unwrap();
        assert_eq!(value["devices"][0]["name"], "sensorX");
        assert_eq!(value["devices"][0]["category"], "subdev");
        assert!(value["devices"][0].get("entity").is_none());
        assert_eq!(value["summary"]["present"], 3);
    }
}
