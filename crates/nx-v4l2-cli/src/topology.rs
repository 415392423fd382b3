// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Media graph topology of the discovered devices.

use crate::error::{print_json, CliError};
use clap::Args as ClapArgs;
use nx_v4l2::discovery::Discovery;
use nx_v4l2::media::{EntityLinks, MediaInfo};
use nx_v4l2::role::Role;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Show only this role
    role: Option<Role>,

    /// Instance of the role
    #[arg(default_value_t = 0)]
    instance: usize,
}

#[derive(Debug, Serialize)]
struct TopologyOutput {
    media: MediaSummary,
    entities: Vec<EntityOutput>,
}

#[derive(Debug, Serialize)]
struct MediaSummary {
    driver: String,
    model: String,
    bus_info: String,
}

#[derive(Debug, Serialize)]
struct EntityOutput {
    role: String,
    instance: usize,
    entity: u32,
    pads: Vec<PadOutput>,
    links: Vec<LinkOutput>,
}

#[derive(Debug, Serialize)]
struct PadOutput {
    index: u16,
    direction: String,
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    source: String,
    sink: String,
    enabled: bool,
    immutable: bool,
}

pub fn execute(discovery: &Discovery, args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing topology command: {:?}", args);

    let targets: Vec<(Role, usize)> = match args.role {
        Some(role) => vec![(role, args.instance)],
        None => discovery
            .directory()
            .present()
            .filter(|(_, _, entry)| entry.has_entity())
            .map(|(role, instance, _)| (role, instance))
            .collect(),
    };

    let info = discovery.media_info()?;
    let mut entities = Vec::with_capacity(targets.len());
    for (role, instance) in targets {
        let links = discovery.links(role, instance)?;
        entities.push(entity_output(role, instance, &links));
    }

    let output = TopologyOutput {
        media: media_summary(&info),
        entities,
    };

    if json {
        print_json(&output)?;
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn media_summary(info: &MediaInfo) -> MediaSummary {
    MediaSummary {
        driver: info.driver.clone(),
        model: info.model.clone(),
        bus_info: info.bus_info.clone(),
    }
}

fn entity_output(role: Role, instance: usize, links: &EntityLinks) -> EntityOutput {
    EntityOutput {
        role: role.to_string(),
        instance,
        entity: links.entity,
        pads: links
            .pads
            .iter()
            .map(|pad| PadOutput {
                index: pad.index,
                direction: pad.direction().to_string(),
            })
            .collect(),
        links: links
            .links
            .iter()
            .map(|link| LinkOutput {
                source: format!("{}:{}", link.source.entity, link.source.index),
                sink: format!("{}:{}", link.sink.entity, link.sink.index),
                enabled: link.is_enabled(),
                immutable: link.is_immutable(),
            })
            .collect(),
    }
}

fn print_text_output(output: &TopologyOutput) {
    println!(
        "Media device: {} ({}, {})\n",
        output.media.model, output.media.driver, output.media.bus_info
    );

    if output.entities.is_empty() {
        println!("No media entities found");
        return;
    }

    for entity in &output.entities {
        println!("  {} {}: entity {}", entity.role, entity.instance, entity.entity);
        let pads: Vec<String> = entity
            .pads
            .iter()
            .map(|pad| format!("{} {}", pad.index, pad.direction))
            .collect();
        println!("    Pads: {}", pads.join(", "));
        for link in &entity.links {
            println!(
                "    {} -> {} {}{}",
                link.source,
                link.sink,
                if link.enabled { "ACTIVE" } else { "INACTIVE" },
                if link.immutable { " (immutable)" } else { "" }
            );
        }
    }
}
