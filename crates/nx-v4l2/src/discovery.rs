// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Resolver API
//!
//! [`Discovery`] owns the device directory and the media-graph handle of one
//! application. The first call that needs the directory runs the discovery
//! pipeline; every later call, from any thread, is served from the result.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::Config;
use crate::entry::{Directory, Entry};
use crate::media::{self, EntityLinks, LinkDesc, MediaDevice, MediaGraph, MediaInfo, PadDesc};
use crate::role::Role;
use crate::{sysfs, video, Error};

type Opener<G> = Box<dyn Fn(&Path) -> io::Result<G> + Send + Sync>;

/// Discovery context
///
/// Create one per application and share it by reference (or `Arc`) with
/// every consumer. Discovery runs at most once per context: concurrent first
/// callers block until the single run completes.
///
/// # Example
///
/// ```no_run
/// use nx_v4l2::config::Config;
/// use nx_v4l2::discovery::Discovery;
/// use nx_v4l2::role::Role;
///
/// let discovery = Discovery::new(Config::default());
///
/// for (role, instance, entry) in discovery.directory().present() {
///     println!("{} {}: {} {}", role, instance, entry.device_name, entry.device_node);
/// }
///
/// let decimator = discovery.open_device(Role::DecimatorVideo, 0)?;
/// # drop(decimator);
/// # Ok::<(), nx_v4l2::Error>(())
/// ```
pub struct Discovery<G: MediaGraph = MediaDevice> {
    config: Config,
    directory: OnceLock<Directory>,
    media: Mutex<Option<G>>,
    opener: Opener<G>,
}

impl Discovery<MediaDevice> {
    /// Discovery against the kernel media device named in `config`.
    pub fn new(config: Config) -> Self {
        Self::with_opener(config, |path| MediaDevice::open(path))
    }

    /// Discovery configured from the `NX_V4L2_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }
}

impl<G: MediaGraph> Discovery<G> {
    /// Discovery with a custom media-graph opener.
    ///
    /// `opener` receives [`Config::media_device`] and is called lazily, the
    /// first time the graph is needed and again after [`cleanup`](Self::cleanup).
    pub fn with_opener<F>(config: Config, opener: F) -> Self
    where
        F: Fn(&Path) -> io::Result<G> + Send + Sync + 'static,
    {
        Discovery {
            config,
            directory: OnceLock::new(),
            media: Mutex::new(None),
            opener: Box::new(opener),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether discovery has already run.
    pub fn is_cached(&self) -> bool {
        self.directory.get().is_some()
    }

    /// The device directory, running discovery first if needed.
    pub fn directory(&self) -> &Directory {
        self.directory.get_or_init(|| self.run_pipeline())
    }

    fn lock_media(&self) -> MutexGuard<'_, Option<G>> {
        self.media.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The open media graph, opening it if needed.
    fn ensure_media<'a>(&self, slot: &'a mut Option<G>) -> io::Result<&'a G> {
        let graph = match slot.take() {
            Some(graph) => graph,
            None => (self.opener)(self.config.media_device())?,
        };
        Ok(slot.insert(graph))
    }

    fn media_error(&self, source: io::Error) -> Error {
        log::warn!(
            "failed to open media device {}: {}",
            self.config.media_device().display(),
            source
        );
        Error::OpenFailed {
            path: self.config.media_device().to_path_buf(),
            source,
        }
    }

    /// Sensor scan, video-node walk, then media-graph annotation.
    fn run_pipeline(&self) -> Directory {
        let mut directory = Directory::new();

        let sensors = sysfs::scan_sensors(&self.config, &mut directory);
        let nodes = video::enumerate_video_nodes(&self.config, &mut directory);

        let mut slot = self.lock_media();
        let entities = match self.ensure_media(&mut slot) {
            Ok(graph) => media::annotate_entities(&mut directory, graph).unwrap_or_else(|err| {
                log::warn!("media graph enumeration failed: {}", err);
                0
            }),
            Err(err) => {
                log::warn!(
                    "failed to open media device {}: {}",
                    self.config.media_device().display(),
                    err
                );
                0
            }
        };

        log::info!(
            "discovered {} sensors, {} video nodes, {} media entities",
            sensors,
            nodes,
            entities
        );
        directory
    }

    /// Open the device node of `role`/`instance` for reading and writing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInstance`] if `instance` is out of range for `role`
    /// - [`Error::NoSuchDevice`] if the device is absent or has no node; no
    ///   open is attempted
    /// - [`Error::OpenFailed`] with the OS error if the open fails
    pub fn open_device(&self, role: Role, instance: usize) -> Result<File, Error> {
        let entry = match self.directory().lookup(role, instance)? {
            Some(entry) if entry.has_node() => entry,
            _ => {
                log::warn!("can't find device for {} {}", role, instance);
                return Err(Error::NoSuchDevice { role, instance });
            }
        };

        let path = PathBuf::from(&entry.device_node);
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| {
                log::warn!("open failed for {} ({})", entry.device_name, path.display());
                Error::OpenFailed { path, source }
            })
    }

    /// Whether sensor `instance` is a MIPI camera.
    ///
    /// Runs discovery if it has not run yet. False for absent or
    /// out-of-range sensors.
    pub fn is_mipi_camera(&self, instance: usize) -> bool {
        self.directory().is_mipi_camera(instance)
    }

    /// Resolve one end of a link.
    ///
    /// The single CSI receiver serves every pipeline instance.
    fn endpoint(&self, role: Role, instance: usize, pad: u16) -> Result<&Entry, Error> {
        let instance = if role == Role::Csi { 0 } else { instance };
        let entry = self
            .directory()
            .lookup(role, instance)?
            .ok_or(Error::NoSuchDevice { role, instance })?;

        if pad >= entry.pad_count {
            log::warn!("invalid {} pad {}/{}", role, pad, entry.pad_count);
            return Err(Error::InvalidPad {
                role,
                pad,
                pads: entry.pad_count,
            });
        }
        Ok(entry)
    }

    /// Enable or disable the media link from `src_role`:`src_pad` to
    /// `sink_role`:`sink_pad` of pipeline `instance`.
    ///
    /// Both endpoints are resolved and their pads checked before the single
    /// link request is issued.
    ///
    /// # Errors
    ///
    /// - [`Error::NoSuchDevice`] / [`Error::InvalidInstance`] if an endpoint
    ///   does not resolve
    /// - [`Error::InvalidPad`] if a pad is not below the entity's pad count
    /// - [`Error::OpenFailed`] if the media device cannot be opened
    /// - [`Error::Io`] with the OS error if the kernel rejects the request
    pub fn link(
        &self,
        enable: bool,
        instance: usize,
        src_role: Role,
        src_pad: u16,
        sink_role: Role,
        sink_pad: u16,
    ) -> Result<(), Error> {
        let source = self.endpoint(src_role, instance, src_pad)?;
        let sink = self.endpoint(sink_role, instance, sink_pad)?;

        let request = LinkDesc::new(
            enable,
            PadDesc::source(source.entity_id, src_pad),
            PadDesc::sink(sink.entity_id, sink_pad),
        );

        let mut slot = self.lock_media();
        let graph = self
            .ensure_media(&mut slot)
            .map_err(|err| self.media_error(err))?;
        graph.setup_link(&request).map_err(|err| {
            log::warn!("link setup failed for {}: {}", request, err);
            Error::Io(err)
        })?;

        log::debug!("{} {}", if enable { "linked" } else { "unlinked" }, request);
        Ok(())
    }

    /// Pads and outbound links of the media entity behind `role`/`instance`.
    pub fn links(&self, role: Role, instance: usize) -> Result<EntityLinks, Error> {
        let entry = self
            .directory()
            .lookup(role, instance)?
            .filter(|entry| entry.has_entity())
            .ok_or(Error::NoSuchDevice { role, instance })?;

        let mut slot = self.lock_media();
        let graph = self
            .ensure_media(&mut slot)
            .map_err(|err| self.media_error(err))?;
        Ok(graph.enum_links(entry.entity_id)?)
    }

    /// Identification of the media device.
    pub fn media_info(&self) -> Result<MediaInfo, Error> {
        let mut slot = self.lock_media();
        let graph = self
            .ensure_media(&mut slot)
            .map_err(|err| self.media_error(err))?;
        Ok(graph.device_info()?)
    }

    /// Close the media-graph handle.
    ///
    /// The directory stays cached. Later graph requests reopen the device.
    pub fn cleanup(&self) {
        if self.lock_media().take().is_some() {
            log::debug!("closed media device {}", self.config.media_device().display());
        }
    }
}
