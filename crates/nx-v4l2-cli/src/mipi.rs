// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::{print_json, CliError};
use clap::Args as ClapArgs;
use nx_v4l2::discovery::Discovery;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Sensor slot
    #[arg(default_value_t = 0)]
    instance: usize,
}

#[derive(Debug, Serialize)]
struct MipiOutput {
    instance: usize,
    mipi: bool,
}

pub fn execute(discovery: &Discovery, args: Args, json: bool) -> Result<(), CliError> {
    let output = MipiOutput {
        instance: args.instance,
        mipi: discovery.is_mipi_camera(args.instance),
    };

    if json {
        print_json(&output)?;
    } else if output.mipi {
        println!("sensor {}: MIPI camera", output.instance);
    } else {
        println!("sensor {}: not a MIPI camera", output.instance);
    }

    Ok(())
}
