// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Raw Linux media-controller ABI used by `nx-v4l2`.
//!
//! The structures mirror `<linux/media.h>` field for field and the request
//! codes are computed with the generic `_IOWR` encoding used by arm, arm64
//! and x86 kernels. Only the four requests needed for entity discovery and
//! link setup are provided.

#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

// Re-export libc for errno constants
pub use libc;

use std::io;
use std::mem::size_of;
use std::os::fd::{AsRawFd, BorrowedFd};

/// OR'ed into `media_entity_desc::id` to request the entity following that id.
pub const MEDIA_ENT_ID_FLAG_NEXT: u32 = 1 << 31;

pub const MEDIA_PAD_FL_SINK: u32 = 1 << 0;
pub const MEDIA_PAD_FL_SOURCE: u32 = 1 << 1;

pub const MEDIA_LNK_FL_ENABLED: u32 = 1 << 0;
pub const MEDIA_LNK_FL_IMMUTABLE: u32 = 1 << 1;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct media_device_info {
    pub driver: [u8; 16],
    pub model: [u8; 32],
    pub serial: [u8; 40],
    pub bus_info: [u8; 32],
    pub media_version: u32,
    pub hw_revision: u32,
    pub driver_version: u32,
    pub reserved: [u32; 31],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct media_entity_desc {
    pub id: u32,
    pub name: [u8; 32],
    pub type_: u32,
    pub revision: u32,
    pub flags: u32,
    pub group_id: u32,
    pub pads: u16,
    pub links: u16,
    pub reserved: [u32; 4],
    /// Union of the `dev`/`alsa`/`v4l`/`fb`/`dvb` descriptors.
    pub raw: [u8; 184],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct media_pad_desc {
    pub entity: u32,
    pub index: u16,
    pub flags: u32,
    pub reserved: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct media_link_desc {
    pub source: media_pad_desc,
    pub sink: media_pad_desc,
    pub flags: u32,
    pub reserved: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct media_links_enum {
    pub entity: u32,
    pub pads: *mut media_pad_desc,
    pub links: *mut media_link_desc,
    pub reserved: [u32; 4],
}

const _: () = assert!(size_of::<media_device_info>() == 256);
const _: () = assert!(size_of::<media_entity_desc>() == 256);
const _: () = assert!(size_of::<media_pad_desc>() == 20);
const _: () = assert!(size_of::<media_link_desc>() == 52);

impl Default for media_device_info {
    fn default() -> Self {
        // SAFETY: plain-old-data, all-zero is a valid value
        unsafe { std::mem::zeroed() }
    }
}

impl Default for media_entity_desc {
    fn default() -> Self {
        // SAFETY: plain-old-data, all-zero is a valid value
        unsafe { std::mem::zeroed() }
    }
}

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;
const IOC_READ_WRITE: u32 = 3;

const fn iowr(ty: u8, nr: u32, size: usize) -> u32 {
    (IOC_READ_WRITE << IOC_DIRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | (nr << IOC_NRSHIFT)
}

pub const MEDIA_IOC_DEVICE_INFO: u32 = iowr(b'|', 0x00, size_of::<media_device_info>());
pub const MEDIA_IOC_ENUM_ENTITIES: u32 = iowr(b'|', 0x01, size_of::<media_entity_desc>());
pub const MEDIA_IOC_ENUM_LINKS: u32 = iowr(b'|', 0x02, size_of::<media_links_enum>());
pub const MEDIA_IOC_SETUP_LINK: u32 = iowr(b'|', 0x03, size_of::<media_link_desc>());

/// Issue a single media-controller request.
///
/// Returns the OS error verbatim when the kernel rejects the request.
unsafe fn media_ioctl<T>(fd: BorrowedFd<'_>, request: u32, arg: *mut T) -> io::Result<()> {
    let ret = unsafe { libc::ioctl(fd.as_raw_fd(), request as _, arg) };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// `MEDIA_IOC_DEVICE_INFO`
pub fn device_info(fd: BorrowedFd<'_>, info: &mut media_device_info) -> io::Result<()> {
    // SAFETY: info is a valid, correctly sized media_device_info
    unsafe { media_ioctl(fd, MEDIA_IOC_DEVICE_INFO, info as *mut media_device_info) }
}

/// `MEDIA_IOC_ENUM_ENTITIES`
///
/// `desc.id` selects the entity; OR it with [`MEDIA_ENT_ID_FLAG_NEXT`] to get
/// the first entity with a larger id.
pub fn enum_entities(fd: BorrowedFd<'_>, desc: &mut media_entity_desc) -> io::Result<()> {
    // SAFETY: desc is a valid, correctly sized media_entity_desc
    unsafe { media_ioctl(fd, MEDIA_IOC_ENUM_ENTITIES, desc as *mut media_entity_desc) }
}

/// `MEDIA_IOC_SETUP_LINK`
pub fn setup_link(fd: BorrowedFd<'_>, desc: &mut media_link_desc) -> io::Result<()> {
    // SAFETY: desc is a valid, correctly sized media_link_desc
    unsafe { media_ioctl(fd, MEDIA_IOC_SETUP_LINK, desc as *mut media_link_desc) }
}

/// `MEDIA_IOC_ENUM_LINKS`
///
/// # Safety
///
/// The kernel writes one descriptor per pad and one per outbound link of
/// `entity`. `pads` and `links` must be at least as long as the pad and link
/// counts reported for that entity by `MEDIA_IOC_ENUM_ENTITIES`.
pub unsafe fn enum_links(
    fd: BorrowedFd<'_>,
    entity: u32,
    pads: &mut [media_pad_desc],
    links: &mut [media_link_desc],
) -> io::Result<()> {
    let mut request = media_links_enum {
        entity,
        pads: pads.as_mut_ptr(),
        links: links.as_mut_ptr(),
        reserved: [0; 4],
    };
    unsafe { media_ioctl(fd, MEDIA_IOC_ENUM_LINKS, &mut request as *mut media_links_enum) }
}

/// Convert a NUL-padded kernel string field into an owned string.
pub fn field_to_string(field: &[u8]) -> String {
    let len = field.iter().position(|&c| c == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).into_owned()
}
