// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Media graph descriptors
//!
//! Owned, safe counterparts of the media-controller ABI structures.

use std::fmt;

use nx_v4l2_sys as ffi;

/// Media graph entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDesc {
    /// Entity id, unique within the graph
    pub id: u32,
    /// Entity name as registered by the driver
    pub name: String,
    /// Number of pads
    pub pads: u16,
    /// Number of outbound links
    pub links: u16,
}

impl EntityDesc {
    pub(crate) fn from_ffi(desc: &ffi::media_entity_desc) -> Self {
        EntityDesc {
            id: desc.id,
            name: ffi::field_to_string(&desc.name),
            pads: desc.pads,
            links: desc.links,
        }
    }
}

/// Data flow direction of a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadDirection {
    /// Pad receives data
    Sink,
    /// Pad emits data
    Source,
    /// Neither flag set
    Unknown,
}

impl fmt::Display for PadDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadDirection::Sink => write!(f, "INPUT"),
            PadDirection::Source => write!(f, "OUTPUT"),
            PadDirection::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One pad of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadDesc {
    /// Entity the pad belongs to
    pub entity: u32,
    /// Pad index within the entity
    pub index: u16,
    /// `MEDIA_PAD_FL_*` flags
    pub flags: u32,
}

impl PadDesc {
    /// Source pad endpoint for a link request.
    pub fn source(entity: u32, index: u16) -> Self {
        PadDesc {
            entity,
            index,
            flags: ffi::MEDIA_PAD_FL_SOURCE,
        }
    }

    /// Sink pad endpoint for a link request.
    pub fn sink(entity: u32, index: u16) -> Self {
        PadDesc {
            entity,
            index,
            flags: ffi::MEDIA_PAD_FL_SINK,
        }
    }

    pub fn direction(&self) -> PadDirection {
        if self.flags & ffi::MEDIA_PAD_FL_SINK != 0 {
            PadDirection::Sink
        } else if self.flags & ffi::MEDIA_PAD_FL_SOURCE != 0 {
            PadDirection::Source
        } else {
            PadDirection::Unknown
        }
    }
}

impl From<&ffi::media_pad_desc> for PadDesc {
    fn from(desc: &ffi::media_pad_desc) -> Self {
        PadDesc {
            entity: desc.entity,
            index: desc.index,
            flags: desc.flags,
        }
    }
}

impl From<&PadDesc> for ffi::media_pad_desc {
    fn from(pad: &PadDesc) -> Self {
        ffi::media_pad_desc {
            entity: pad.entity,
            index: pad.index,
            flags: pad.flags,
            reserved: [0; 2],
        }
    }
}

impl fmt::Display for PadDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.index, self.direction())
    }
}

/// Link between a source pad and a sink pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkDesc {
    pub source: PadDesc,
    pub sink: PadDesc,
    /// `MEDIA_LNK_FL_*` flags
    pub flags: u32,
}

impl LinkDesc {
    /// Link request between two endpoints, enabled or disabled.
    pub fn new(enable: bool, source: PadDesc, sink: PadDesc) -> Self {
        LinkDesc {
            source,
            sink,
            flags: if enable { ffi::MEDIA_LNK_FL_ENABLED } else { 0 },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.flags & ffi::MEDIA_LNK_FL_ENABLED != 0
    }

    pub fn is_immutable(&self) -> bool {
        self.flags & ffi::MEDIA_LNK_FL_IMMUTABLE != 0
    }
}

impl From<&ffi::media_link_desc> for LinkDesc {
    fn from(desc: &ffi::media_link_desc) -> Self {
        LinkDesc {
            source: PadDesc::from(&desc.source),
            sink: PadDesc::from(&desc.sink),
            flags: desc.flags,
        }
    }
}

impl From<&LinkDesc> for ffi::media_link_desc {
    fn from(link: &LinkDesc) -> Self {
        ffi::media_link_desc {
            source: (&link.source).into(),
            sink: (&link.sink).into(),
            flags: link.flags,
            reserved: [0; 2],
        }
    }
}

impl fmt::Display for LinkDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:x}:{:x}] ------------> [{:x}:{:x}] {}",
            self.source.entity,
            self.source.index,
            self.sink.entity,
            self.sink.index,
            if self.is_enabled() { "ACTIVE" } else { "INACTIVE" }
        )
    }
}

/// Pads and outbound links of one entity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityLinks {
    pub entity: u32,
    pub pads: Vec<PadDesc>,
    pub links: Vec<LinkDesc>,
}

impl fmt::Display for EntityLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {:x}:", self.entity)?;
        for pad in &self.pads {
            write!(f, " {}", pad)?;
        }
        for link in &self.links {
            write!(f, "\n  {}", link)?;
        }
        Ok(())
    }
}

/// Identification of a media device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaInfo {
    pub driver: String,
    pub model: String,
    pub serial: String,
    pub bus_info: String,
    pub media_version: u32,
    pub hw_revision: u32,
    pub driver_version: u32,
}

impl MediaInfo {
    pub(crate) fn from_ffi(info: &ffi::media_device_info) -> Self {
        MediaInfo {
            driver: ffi::field_to_string(&info.driver),
            model: ffi::field_to_string(&info.model),
            serial: ffi::field_to_string(&info.serial),
            bus_info: ffi::field_to_string(&info.bus_info),
            media_version: info.media_version,
            hw_revision: info.hw_revision,
            driver_version: info.driver_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_request_flags() {
        let link = LinkDesc::new(true, PadDesc::source(3, 1), PadDesc::sink(9, 0));
        assert!(link.is_enabled());
        assert!(!link.is_immutable());
        assert_eq!(link.source.direction(), PadDirection::Source);
        assert_eq!(link.sink.direction(), PadDirection::Sink);

        let raw = ffi::media_link_desc::from(&link);
        assert_eq!(raw.flags, ffi::MEDIA_LNK_FL_ENABLED);
        assert_eq!(raw.source.flags, ffi::MEDIA_PAD_FL_SOURCE);
        assert_eq!(raw.sink.entity, 9);

        let off = LinkDesc::new(false, PadDesc::source(3, 1), PadDesc::sink(9, 0));
        assert_eq!(off.flags & ffi::MEDIA_LNK_FL_ENABLED, 0);
    }

    #[test]
    fn test_link_display() {
        let link = LinkDesc::new(true, PadDesc::source(0x1a, 1), PadDesc::sink(0x20, 0));
        assert_eq!(format!("{}", link), "[1a:1] ------------> [20:0] ACTIVE");
        let off = LinkDesc::new(false, PadDesc::source(1, 0), PadDesc::sink(2, 0));
        assert!(format!("{}", off).ends_with("INACTIVE"));
    }

    #[test]
    fn test_entity_from_ffi() {
        let mut raw = ffi::media_entity_desc::default();
        raw.id = 5;
        raw.name[..6].copy_from_slice(b"nx-csi");
        raw.pads = 2;
        raw.links = 1;
        let entity = EntityDesc::from_ffi(&raw);
        assert_eq!(entity.name, "nx-csi");
        assert_eq!((entity.id, entity.pads, entity.links), (5, 2, 1));
    }

    #[test]
    fn test_pad_display() {
        assert_eq!(format!("{}", PadDesc::sink(1, 0)), "(0, INPUT)");
        assert_eq!(format!("{}", PadDesc::source(1, 2)), "(2, OUTPUT)");
    }
}
