// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod error;
mod link;
mod list;
mod mipi;
mod open;
mod topology;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;

/// nx-v4l2 - Nexell capture pipeline discovery tool
#[derive(Parser)]
#[command(name = "nx-v4l2")]
#[command(version)]
#[command(about = "nx-v4l2 - Nexell V4L2 capture pipeline discovery tool")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pipeline devices found on this system
    List(list::Args),

    /// Open the device node of a role/instance
    Open(open::Args),

    /// Enable or disable a media link between two roles
    Link(link::Args),

    /// Show the media graph pads and links of present devices
    Topology(topology::Args),

    /// Report whether a camera sensor is attached over MIPI
    Mipi(mipi::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let discovery = nx_v4l2::discovery::Discovery::from_env();

    let result = match cli.command {
        Commands::List(args) => list::execute(&discovery, args, cli.json),
        Commands::Open(args) => open::execute(&discovery, args, cli.json),
        Commands::Link(args) => link::execute(&discovery, args, cli.json),
        Commands::Topology(args) => topology::execute(&discovery, args, cli.json),
        Commands::Mipi(args) => mipi::execute(&discovery, args, cli.json),
    };

    discovery.cleanup();
    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}
