// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Media-controller graph access
//!
//! The kernel exposes the capture pipeline as a graph of entities connected
//! by links between pads. This module provides:
//!
//! - [`MediaGraph`] - the requests discovery and link setup issue against a graph
//! - [`MediaDevice`] - [`MediaGraph`] over a `/dev/mediaN` node
//! - [`Entities`] - iterator over the entities of a graph, in id order
//! - [`annotate_entities`] - the discovery stage attaching entity ids to the directory
//!
//! # Entity Enumeration
//!
//! Entities are listed by repeatedly asking the kernel for "the first entity
//! with an id greater than N", starting at 0 and continuing from the last id
//! returned. The first failing request ends the sequence:
//!
//! ```no_run
//! use nx_v4l2::media::{entities, MediaDevice};
//!
//! let media = MediaDevice::open("/dev/media0")?;
//! for entity in entities(&media) {
//!     println!("{}: {} ({} pads, {} links)", entity.id, entity.name, entity.pads, entity.links);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

mod device;
mod graph;

pub use device::MediaDevice;
pub use graph::{EntityDesc, EntityLinks, LinkDesc, MediaInfo, PadDesc, PadDirection};

use std::io;
use std::iter::FusedIterator;

use crate::classify::classify;
use crate::entry::Directory;
use crate::Error;

/// Requests issued against a media graph
///
/// Implemented by [`MediaDevice`] for the kernel interface. Discovery is
/// generic over this trait so the graph can be replaced, for example by an
/// in-memory graph in tests.
pub trait MediaGraph {
    /// First entity whose id is greater than `after`.
    ///
    /// An error means there are no further entities.
    fn next_entity(&self, after: u32) -> io::Result<EntityDesc>;

    /// Enable or disable the link described by `link`.
    fn setup_link(&self, link: &LinkDesc) -> io::Result<()>;

    /// Pads and outbound links of the entity with id `entity`.
    fn enum_links(&self, entity: u32) -> io::Result<EntityLinks>;

    /// Identification of the media device.
    fn device_info(&self) -> io::Result<MediaInfo>;
}

/// Iterator over the entities of a [`MediaGraph`]
///
/// Created by [`entities`]. Each entity is yielded once, in increasing id
/// order. The sequence ends at the first failed request or if the graph
/// returns an id that does not advance; it is not restarted.
pub struct Entities<'a, G: MediaGraph + ?Sized> {
    graph: &'a G,
    cursor: u32,
    done: bool,
}

/// Enumerate the entities of `graph`.
pub fn entities<G: MediaGraph + ?Sized>(graph: &G) -> Entities<'_, G> {
    Entities {
        graph,
        cursor: 0,
        done: false,
    }
}

impl<G: MediaGraph + ?Sized> Iterator for Entities<'_, G> {
    type Item = EntityDesc;

    fn next(&mut self) -> Option<EntityDesc> {
        if self.done {
            return None;
        }

        match self.graph.next_entity(self.cursor) {
            Ok(entity) if entity.id > self.cursor => {
                self.cursor = entity.id;
                Some(entity)
            }
            Ok(entity) => {
                log::warn!(
                    "entity id {} does not follow {}, stopping enumeration",
                    entity.id,
                    self.cursor
                );
                self.done = true;
                None
            }
            Err(err) => {
                log::debug!("no entity after {}: {}", self.cursor, err);
                self.done = true;
                None
            }
        }
    }
}

impl<G: MediaGraph + ?Sized> FusedIterator for Entities<'_, G> {}

/// Attach media-graph metadata to the entries of a cached directory.
///
/// Every entity whose name classifies to a present entry sets that entry's
/// `entity_id`, `pad_count` and `link_count`. Entities are visited in id
/// order and the first match for an entry is kept. Existence and device
/// nodes are never changed. Returns the number of entities matched.
///
/// # Errors
///
/// [`Error::NotReady`] if the directory has not been through the video-node
/// walk; the directory is left untouched.
pub fn annotate_entities<G: MediaGraph + ?Sized>(
    directory: &mut Directory,
    graph: &G,
) -> Result<usize, Error> {
    if !directory.is_cached() {
        return Err(Error::NotReady);
    }

    let mut annotated = 0;
    for entity in entities(graph) {
        let Some((role, instance)) = classify(&entity.name, directory) else {
            log::debug!("entity {} {:?} has no role", entity.id, entity.name);
            continue;
        };
        let Ok(entry) = directory.slot_mut(role, instance) else {
            continue;
        };
        if !entry.exists {
            log::debug!(
                "entity {} {:?} matches absent {} {}",
                entity.id,
                entity.name,
                role,
                instance
            );
            continue;
        }
        if entry.has_entity() {
            log::debug!(
                "entity {} {:?}: {} {} already has entity {}",
                entity.id,
                entity.name,
                role,
                instance,
                entry.entity_id
            );
            continue;
        }

        entry.entity_id = entity.id;
        entry.pad_count = entity.pads;
        entry.link_count = entity.links;
        annotated += 1;
    }

    Ok(annotated)
}
