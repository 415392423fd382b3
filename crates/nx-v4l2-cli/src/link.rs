// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Media link setup between two pipeline roles.

use crate::error::{print_json, CliError};
use clap::Args as ClapArgs;
use nx_v4l2::discovery::Discovery;
use nx_v4l2::role::Role;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Source endpoint as ROLE[:PAD], e.g. csi:1
    source: Endpoint,

    /// Sink endpoint as ROLE[:PAD], e.g. clipper:0
    sink: Endpoint,

    /// Pipeline instance both endpoints belong to
    #[arg(short, long, default_value_t = 0)]
    instance: usize,

    /// Disable the link instead of enabling it
    #[arg(long)]
    disable: bool,
}

/// `role[:pad]`, pad defaults to 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Endpoint {
    role: Role,
    pad: u16,
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, pad) = match s.split_once(':') {
            Some((role, pad)) => {
                let pad = pad
                    .parse()
                    .map_err(|e| format!("invalid pad '{}': {}", pad, e))?;
                (role, pad)
            }
            None => (s, 0),
        };
        let role = role.parse::<Role>().map_err(|e| e.to_string())?;
        Ok(Endpoint { role, pad })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.pad)
    }
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    source: String,
    sink: String,
    instance: usize,
    enabled: bool,
}

pub fn execute(discovery: &Discovery, args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing link command: {:?}", args);

    if args.source.role == args.sink.role {
        return Err(CliError::InvalidArgs(format!(
            "source and sink are both {}",
            args.source.role
        )));
    }

    let enable = !args.disable;
    discovery.link(
        enable,
        args.instance,
        args.source.role,
        args.source.pad,
        args.sink.role,
        args.sink.pad,
    )?;

    let output = LinkOutput {
        source: args.source.to_string(),
        sink: args.sink.to_string(),
        instance: args.instance,
        enabled: enable,
    };

    if json {
        print_json(&output)?;
    } else {
        println!(
            "{} {} -> {} (instance {})",
            if enable { "linked" } else { "unlinked" },
            output.source,
            output.sink,
            output.instance
        );
    }

    Ok(())
}
