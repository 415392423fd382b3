// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};

use nx_v4l2_sys as ffi;

use super::graph::{EntityDesc, EntityLinks, LinkDesc, MediaInfo, PadDesc};
use super::MediaGraph;

/// Media-controller device node
///
/// Holds `/dev/mediaN` open for reading and writing; the node is closed when
/// the value is dropped.
#[derive(Debug)]
pub struct MediaDevice {
    file: File,
    path: PathBuf,
}

impl MediaDevice {
    pub fn open(path: impl AsRef<Path>) -> io::Result<MediaDevice> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        log::debug!("opened media device {}", path.display());
        Ok(MediaDevice {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The entity with exactly this id.
    pub fn entity(&self, id: u32) -> io::Result<EntityDesc> {
        let mut desc = ffi::media_entity_desc {
            id,
            ..Default::default()
        };
        ffi::enum_entities(self.file.as_fd(), &mut desc)?;
        Ok(EntityDesc::from_ffi(&desc))
    }
}

impl AsFd for MediaDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl MediaGraph for MediaDevice {
    fn next_entity(&self, after: u32) -> io::Result<EntityDesc> {
        let mut desc = ffi::media_entity_desc {
            id: after | ffi::MEDIA_ENT_ID_FLAG_NEXT,
            ..Default::default()
        };
        ffi::enum_entities(self.file.as_fd(), &mut desc)?;
        Ok(EntityDesc::from_ffi(&desc))
    }

    fn setup_link(&self, link: &LinkDesc) -> io::Result<()> {
        let mut desc = ffi::media_link_desc::from(link);
        ffi::setup_link(self.file.as_fd(), &mut desc)
    }

    fn enum_links(&self, entity: u32) -> io::Result<EntityLinks> {
        // Size the arrays from the kernel's current view of the entity
        let current = self.entity(entity)?;
        let mut pads = vec![ffi::media_pad_desc::default(); usize::from(current.pads)];
        let mut links = vec![ffi::media_link_desc::default(); usize::from(current.links)];

        // SAFETY: pads and links hold the pad and link counts just reported
        // for this entity
        unsafe { ffi::enum_links(self.file.as_fd(), entity, &mut pads, &mut links)? };

        Ok(EntityLinks {
            entity,
            pads: pads.iter().map(PadDesc::from).collect(),
            links: links.iter().map(LinkDesc::from).collect(),
        })
    }

    fn device_info(&self) -> io::Result<MediaInfo> {
        let mut info = ffi::media_device_info::default();
        ffi::device_info(self.file.as_fd(), &mut info)?;
        Ok(MediaInfo::from_ffi(&info))
    }
}
