// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Nexell V4L2 device discovery for Rust
//!
//! Resolves the fixed set of logical capture roles of the Nexell video
//! pipeline (sensor, CSI receiver, clipper, decimator, MPEG-TS output and
//! their video nodes) from a symbolic `(role, instance)` pair to the device
//! node and media-graph entity that implement it on the running system.
//!
//! Discovery runs once per [`Discovery`](discovery::Discovery) context, in
//! three stages:
//!
//! 1. Camera sensors are probed through `/sys/devices/platform/camerasensorN/info`.
//! 2. `/sys/class/video4linux` is walked and every node whose advertised name
//!    maps to a role is recorded with its `/dev` path.
//! 3. The entities of `/dev/media0` are enumerated and matched by name to
//!    attach their entity id, pad count and link count.
//!
//! # Quick Start
//!
//! ```no_run
//! use nx_v4l2::discovery::Discovery;
//! use nx_v4l2::role::Role;
//!
//! let discovery = Discovery::from_env();
//! let clipper = discovery.open_device(Role::ClipperVideo, 0)?;
//!
//! // Route sensor 0 into the CSI receiver
//! discovery.link(true, 0, Role::Sensor, 0, Role::Csi, 0)?;
//!
//! if discovery.is_mipi_camera(0) {
//!     println!("sensor 0 is a MIPI camera");
//! }
//! # drop(clipper);
//! # Ok::<(), nx_v4l2::Error>(())
//! ```
//!
//! Format negotiation, buffer queueing and streaming are left to the caller:
//! the opened file plus [`Role::category`](role::Role::category) and
//! [`Role::buf_type`](role::Role::buf_type) are all those layers need.

use std::{error, fmt, io, path::PathBuf};

use role::Role;

/// Error type for discovery and resolution operations
#[derive(Debug)]
pub enum Error {
    /// A discovery stage ran before the video-node walk completed
    NotReady,

    /// The role/instance is not present on this system or has no device node
    NoSuchDevice { role: Role, instance: usize },

    /// The instance index is outside the role's cardinality
    InvalidInstance { role: Role, instance: usize },

    /// The pad index is not below the entity's pad count
    InvalidPad { role: Role, pad: u16, pads: u16 },

    /// Opening a device node failed
    OpenFailed { path: PathBuf, source: io::Error },

    /// I/O error from the kernel media-controller interface
    Io(io::Error),
}

impl Error {
    /// Negative-errno style code for collaborators that speak the C convention.
    pub fn errno(&self) -> i32 {
        use nx_v4l2_sys::libc;

        match self {
            Error::NotReady => libc::EAGAIN,
            Error::NoSuchDevice { .. } => libc::ENODEV,
            Error::InvalidInstance { .. } | Error::InvalidPad { .. } => libc::EINVAL,
            Error::OpenFailed { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
            Error::Io(err) => err.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotReady => write!(f, "device directory is not cached yet"),
            Error::NoSuchDevice { role, instance } => {
                write!(f, "no such device: {} instance {}", role, instance)
            }
            Error::InvalidInstance { role, instance } => write!(
                f,
                "invalid instance {} for {} (max {})",
                instance,
                role,
                role.instances()
            ),
            Error::InvalidPad { role, pad, pads } => {
                write!(f, "invalid pad {}/{} for {}", pad, pads, role)
            }
            Error::OpenFailed { path, source } => {
                write!(f, "open failed for {}: {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::OpenFailed { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// The role module defines the closed set of logical device roles.
pub mod role;

/// The entry module provides the device directory.
pub mod entry;

/// The config module provides the filesystem locations probed by discovery.
pub mod config;

/// The classify module maps advertised names to roles.
pub mod classify;

/// The sysfs module probes the platform camera sensors.
pub mod sysfs;

/// The video module walks the registered video4linux nodes.
pub mod video;

/// The media module enumerates the kernel media graph.
pub mod media;

/// The discovery module provides the resolver API.
pub mod discovery;
