// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Logical device roles
//!
//! - [`Role`] - The seven logical devices of the capture pipeline
//! - [`Category`] - Subdevice or video node
//! - [`BufType`] - Buffer queue type of a video node

use std::fmt;
use std::str::FromStr;

/// Logical device role
///
/// Each role has a fixed number of instances; see [`Role::instances`].
///
/// | Role | Kind | Instances | Advertised name |
/// |------|------|-----------|-----------------|
/// | [`Role::Sensor`] | subdevice | 3 | from sysfs |
/// | [`Role::Clipper`] | subdevice | 3 | `nx-clipperN` |
/// | [`Role::Decimator`] | subdevice | 3 | `nx-decimatorN` |
/// | [`Role::Csi`] | subdevice | 1 | `nx-csi` |
/// | [`Role::ClipperVideo`] | video | 3 | `VIDEO CLIPPERN` |
/// | [`Role::DecimatorVideo`] | video | 3 | `VIDEO DECIMATORN` |
/// | [`Role::MpegtsVideo`] | video | 3 | `VIDEO MPEGTSN` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Camera sensor subdevice
    Sensor,
    /// Clipper subdevice
    Clipper,
    /// Decimator subdevice
    Decimator,
    /// MIPI CSI receiver subdevice
    Csi,
    /// Clipper capture video node
    ClipperVideo,
    /// Decimator capture video node
    DecimatorVideo,
    /// MPEG-TS output video node
    MpegtsVideo,
}

/// Kind of kernel interface a role is driven through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Graph node without a buffer queue (format and crop only)
    Subdev,
    /// Graph node with a capture or output buffer queue
    Video,
}

/// V4L2 buffer type of a video role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BufType {
    /// `V4L2_BUF_TYPE_VIDEO_CAPTURE_MPLANE`
    CaptureMplane = 9,
    /// `V4L2_BUF_TYPE_VIDEO_OUTPUT_MPLANE`
    OutputMplane = 10,
}

impl Role {
    /// All roles, in directory order.
    pub const ALL: [Role; 7] = [
        Role::Sensor,
        Role::Clipper,
        Role::Decimator,
        Role::Csi,
        Role::ClipperVideo,
        Role::DecimatorVideo,
        Role::MpegtsVideo,
    ];

    /// Total number of (role, instance) slots across all roles.
    pub const SLOTS: usize = 19;

    /// Number of instances this role can have.
    pub fn instances(self) -> usize {
        match self {
            Role::Csi => 1,
            _ => 3,
        }
    }

    /// Stable lower-case label used for display and parsing.
    pub fn name(self) -> &'static str {
        match self {
            Role::Sensor => "sensor",
            Role::Clipper => "clipper",
            Role::Decimator => "decimator",
            Role::Csi => "csi",
            Role::ClipperVideo => "clipper-video",
            Role::DecimatorVideo => "decimator-video",
            Role::MpegtsVideo => "mpegts-video",
        }
    }

    /// Name prefix a subdevice driver advertises, `None` for video roles.
    ///
    /// Sensors have none: their names come from the sysfs sensor scan.
    pub fn subdev_name(self) -> Option<&'static str> {
        match self {
            Role::Clipper => Some("nx-clipper"),
            Role::Decimator => Some("nx-decimator"),
            Role::Csi => Some("nx-csi"),
            _ => None,
        }
    }

    /// Name prefix a video node advertises, `None` for subdevices.
    pub fn video_name(self) -> Option<&'static str> {
        match self {
            Role::ClipperVideo => Some("VIDEO CLIPPER"),
            Role::DecimatorVideo => Some("VIDEO DECIMATOR"),
            Role::MpegtsVideo => Some("VIDEO MPEGTS"),
            _ => None,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Role::Sensor | Role::Clipper | Role::Decimator | Role::Csi => Category::Subdev,
            Role::ClipperVideo | Role::DecimatorVideo | Role::MpegtsVideo => Category::Video,
        }
    }

    /// Buffer type used when queueing on this role, `None` for subdevices.
    pub fn buf_type(self) -> Option<BufType> {
        match self {
            Role::ClipperVideo | Role::DecimatorVideo => Some(BufType::CaptureMplane),
            Role::MpegtsVideo => Some(BufType::OutputMplane),
            _ => None,
        }
    }

    /// Index of this role's first slot in the directory arena.
    pub(crate) fn base(self) -> usize {
        Role::ALL
            .iter()
            .take_while(|role| **role != self)
            .map(|role| role.instances())
            .sum()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when parsing an unknown role label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(String);

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.name() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Subdev => write!(f, "subdev"),
            Category::Video => write!(f, "video"),
        }
    }
}
