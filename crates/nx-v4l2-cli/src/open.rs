// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::{print_json, CliError};
use clap::Args as ClapArgs;
use nx_v4l2::discovery::Discovery;
use nx_v4l2::role::{BufType, Role};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Device role (sensor, clipper, decimator, csi, clipper-video,
    /// decimator-video, mpegts-video)
    role: Role,

    /// Pipeline instance
    #[arg(default_value_t = 0)]
    instance: usize,
}

#[derive(Debug, Serialize)]
struct OpenOutput {
    role: String,
    instance: usize,
    node: String,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    buf_type: Option<u32>,
}

pub fn execute(discovery: &Discovery, args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing open command: {:?}", args);

    let file = discovery.open_device(args.role, args.instance)?;
    log::debug!("opened {:?}", file);

    let node = discovery
        .directory()
        .lookup(args.role, args.instance)?
        .map(|entry| entry.device_node.clone())
        .unwrap_or_default();

    let output = OpenOutput {
        role: args.role.to_string(),
        instance: args.instance,
        node,
        category: args.role.category().to_string(),
        buf_type: args.role.buf_type().map(|t| t as u32),
    };

    if json {
        print_json(&output)?;
    } else {
        print!(
            "{} {}: {} opened ({}",
            output.role, output.instance, output.node, output.category
        );
        match args.role.buf_type() {
            Some(BufType::CaptureMplane) => println!(", capture multi-planar)"),
            Some(BufType::OutputMplane) => println!(", output multi-planar)"),
            None => println!(")"),
        }
    }

    Ok(())
}
